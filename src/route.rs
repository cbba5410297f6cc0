//! Route definitions and route-loader fragments.
//!
//! A [`Route`] is what the application hands to [`Router::add`](crate::Router::add):
//! a pattern, an action, and optionally per-route callbacks and parameter
//! transforms.
//!
//! ```rust
//! use eco::{Flow, Request, Route, Router};
//!
//! async fn show(req: Request) -> String {
//!     format!("user {}", req.param("id").unwrap_or("?"))
//! }
//!
//! let mut router = Router::new();
//! router.add(
//!     Route::new("/users/:id@\\d+", show)
//!         .callback(|_req: &Request| Flow::Continue)
//!         .param("id", |v: String| v.trim_start_matches('0').to_owned()),
//! ).unwrap();
//! ```

use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};
use crate::hook::{Flow, RouteCallback};
use crate::params::Transform;
use crate::request::Request;

/// A route definition.
pub struct Route {
    pub(crate) pattern: String,
    pub(crate) action: RouteAction,
    pub(crate) callbacks: Vec<RouteCallback>,
    pub(crate) params: Vec<(String, Transform)>,
}

pub(crate) enum RouteAction {
    Handler(BoxedHandler),
    /// `"Controller->action"`, resolved on registration.
    Target(String),
    Loader(Loader),
}

impl Route {
    /// A route served by `handler`.
    pub fn new(pattern: &str, handler: impl Handler) -> Self {
        Self::with_action(pattern, RouteAction::Handler(handler.into_boxed_handler()))
    }

    /// A route served by a controller action, `"Controller->action"`.
    pub fn to(pattern: &str, target: &str) -> Self {
        Self::with_action(pattern, RouteAction::Target(target.to_owned()))
    }

    /// A loader route. The pattern must contain a marker segment (`admin*`).
    /// When a request reaches the marker with a segment equal to the marker's
    /// prefix, `provider` is called and its fragments become routes for the
    /// rest of that dispatch. Bare action names resolve against `controller`.
    pub fn loader<F>(pattern: &str, controller: &str, provider: F) -> Self
    where
        F: Fn() -> Vec<RouteFragment> + Send + Sync + 'static,
    {
        Self::with_action(pattern, RouteAction::Loader(Loader {
            controller: controller.to_owned(),
            provider: Arc::new(provider),
        }))
    }

    fn with_action(pattern: &str, action: RouteAction) -> Self {
        Self { pattern: pattern.to_owned(), action, callbacks: Vec::new(), params: Vec::new() }
    }

    /// Runs before the action, after the middle hooks, in registration order.
    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request) -> Flow + Send + Sync + 'static,
    {
        self.callbacks.push(Arc::new(f));
        self
    }

    /// Registers a router-wide transform for parameter `name` along with this
    /// route.
    pub fn param<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.params.push((name.to_owned(), Arc::new(f)));
        self
    }
}

#[derive(Clone)]
pub(crate) struct Loader {
    pub(crate) controller: String,
    pub(crate) provider: Arc<dyn Fn() -> Vec<RouteFragment> + Send + Sync + 'static>,
}

/// One route produced by a loader.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteFragment {
    pub(crate) pattern: String,
    pub(crate) target: Target,
}

/// The action a loader fragment points at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    /// An action of the loader's own controller.
    Action(String),
    Qualified { controller: String, action: String },
}

impl RouteFragment {
    /// `pattern` served by `action` of the loader's controller.
    pub fn action(pattern: &str, action: &str) -> Self {
        Self { pattern: pattern.to_owned(), target: Target::Action(action.to_owned()) }
    }

    /// `pattern` served by `controller`'s `action`.
    pub fn qualified(pattern: &str, controller: &str, action: &str) -> Self {
        Self {
            pattern: pattern.to_owned(),
            target: Target::Qualified {
                controller: controller.to_owned(),
                action: action.to_owned(),
            },
        }
    }
}
