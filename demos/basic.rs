//! Minimal eco application: controllers, a route loader, hooks and error
//! pages, served over HTTP or run from the command line.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic            # HTTP on eco.toml / 127.0.0.1:3000
//!   cargo run --example basic -- /jobs/cleanup          # CLI dispatch
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl http://localhost:3000/files/docs/readme.txt
//!   curl http://localhost:3000/admin/list
//!   curl http://localhost:3000/nope

use eco::{
    Config, Controller, Flow, Hook, Request, Response, Route, RouteFragment, Router, Server,
    StatusCode,
};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::load("eco.toml").unwrap_or_default();

    let app = Router::new()
        .configure(&config)
        .controller("Admin", Controller::new()
            .action("list", admin_list)
            .action("edit", admin_edit))
        .transform("lower", |v| v.to_lowercase())
        .param("id", |v| v.trim_start_matches('0').to_owned())
        .hook(Hook::Before, |req| info!(path = req.path(), "request"))
        .hook(Hook::After, |req| info!(route = req.route(), "done"))
        .route("/", home)
        .register(Route::new("GET@/users/:id@\\d+", get_user).callback(reject_proxied))
        .route("/files/:path+", get_file)
        .route("/tags/:tag:lower", get_tag)
        .route("$/jobs/cleanup", cleanup)
        .register(Route::loader("/admin*", "Admin", admin_routes))
        .on_error(StatusCode::NOT_FOUND, not_found);

    let mut args = std::env::args();
    if args.len() > 1 {
        let code = eco::cli::run(&app, args.by_ref()).await;
        std::process::exit(code);
    }

    Server::from_config(&config)
        .expect("invalid server address")
        .serve(app)
        .await
        .expect("server error");
}

fn admin_routes() -> Vec<RouteFragment> {
    vec![
        RouteFragment::action("/admin/list", "list"),
        RouteFragment::qualified("/admin/edit/:id", "Admin", "edit"),
    ]
}

fn reject_proxied(req: &Request) -> Flow {
    match req.header("x-forwarded-for") {
        Some(_) => Flow::Stop(Response::status(StatusCode::FORBIDDEN)),
        None => Flow::Continue,
    }
}

async fn home(_req: Request) -> Response {
    Response::html("<h1>eco</h1>")
}

async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
}

async fn get_file(req: Request) -> String {
    req.wildcard("path").unwrap_or_default().join("/")
}

async fn get_tag(req: Request) -> String {
    format!("tag {}", req.param("tag").unwrap_or_default())
}

async fn cleanup(_req: Request) -> &'static str {
    "cleanup done\n"
}

async fn admin_list(_req: Request) -> &'static str {
    "admin: list"
}

async fn admin_edit(req: Request) -> String {
    format!("admin: edit {}", req.param("id").unwrap_or_default())
}

async fn not_found(req: Request) -> Response {
    let message = req.error().map(ToString::to_string).unwrap_or_default();
    Response::html(format!("<h1>404</h1><p>{message}</p>"))
}
