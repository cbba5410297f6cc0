//! # eco
//!
//! A pattern router and dispatcher for server-rendered web applications,
//! served over HTTP or driven from the command line.
//!
//! ## Patterns
//!
//! Routes are tried in registration order; the first full match wins.
//!
//! | Pattern              | Matches                                   |
//! |----------------------|-------------------------------------------|
//! | `/users/:id@\d+`     | `/users/42` → `id = "42"`                 |
//! | `/files/:path+`      | `/files/a/b` → `path = ["a", "b"]`        |
//! | `/search/:q?`        | `/search` and `/search/cats`              |
//! | `GET\|HEAD@/item/:id` | only `GET` and `HEAD` requests           |
//! | `$/jobs/cleanup`     | only from the command line                |
//! | `/admin*`            | fires a route loader on `/admin/...`      |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use eco::{Request, Response, Router, Server, StatusCode};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .route("/", home)
//!         .route("GET@/users/:id@\\d+", show_user)
//!         .on_error(StatusCode::NOT_FOUND, not_found);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn home(_req: Request) -> Response {
//!     Response::html("<h1>Home</h1>")
//! }
//!
//! async fn show_user(req: Request) -> String {
//!     format!("user {}", req.param("id").unwrap_or_default())
//! }
//!
//! async fn not_found(req: Request) -> Response {
//!     Response::html(format!("<p>{} was not found</p>", req.path()))
//! }
//! ```

mod config;
mod controller;
mod dispatch;
mod error;
mod handler;
mod hook;
mod method;
mod params;
mod pattern;
mod request;
mod response;
mod route;
mod router;
mod server;
mod table;

pub mod cli;

pub use config::{Config, ErrorLevel, LogConfig, ServerConfig};
pub use controller::Controller;
pub use error::{ConfigError, Error};
pub use handler::Handler;
pub use hook::{Flow, Hook};
pub use http::StatusCode;
pub use method::{Method, MethodSet};
pub use params::{Param, Params};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use route::{Route, RouteFragment, Target};
pub use router::Router;
pub use server::Server;
