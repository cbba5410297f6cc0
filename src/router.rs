//! The application router.
//!
//! Routes are tried in registration order and the first full match wins;
//! there is no specificity ranking. Build the router once at startup, then
//! share it read-only with [`Server::serve`](crate::Server::serve) or
//! [`cli::run`](crate::cli::run).

use std::collections::HashMap;
use std::sync::Arc;

use http::StatusCode;
use tracing::debug;

use crate::config::{Config, ErrorLevel};
use crate::controller::{Controller, Controllers};
use crate::error::ConfigError;
use crate::handler::{BoxedHandler, Handler};
use crate::hook::{Hook, Hooks, NotFoundFn};
use crate::params::ParamCallbacks;
use crate::pattern::Pattern;
use crate::request::Request;
use crate::response::Response;
use crate::route::{Route, RouteAction, RouteFragment, Target};
use crate::table::{Entry, EntryAction, RouteTable};

/// The application router.
///
/// ```rust
/// use eco::{Controller, Request, Route, Router, StatusCode};
///
/// async fn home(_req: Request) -> &'static str { "home" }
/// async fn show(req: Request) -> String {
///     format!("user {}", req.param("id").unwrap_or("?"))
/// }
/// async fn missing(_req: Request) -> StatusCode { StatusCode::NOT_FOUND }
///
/// let router = Router::new()
///     .controller("Users", Controller::new().action("show", show))
///     .route("/", home)
///     .register(Route::to("GET@/users/:id@\\d+", "Users->show"))
///     .on_error(StatusCode::NOT_FOUND, missing);
/// ```
pub struct Router {
    pub(crate) table: RouteTable,
    pub(crate) controllers: Controllers,
    pub(crate) callbacks: ParamCallbacks,
    pub(crate) hooks: Hooks,
    pub(crate) not_found: Option<NotFoundFn>,
    pub(crate) error_handlers: HashMap<StatusCode, BoxedHandler>,
    pub(crate) error_level: ErrorLevel,
}

impl Router {
    pub fn new() -> Self {
        Self {
            table: RouteTable::default(),
            controllers: Controllers::default(),
            callbacks: ParamCallbacks::default(),
            hooks: Hooks::default(),
            not_found: None,
            error_handlers: HashMap::new(),
            error_level: ErrorLevel::default(),
        }
    }

    /// Applies the `[log]` settings.
    pub fn configure(mut self, config: &Config) -> Self {
        self.error_level = config.log.error_level;
        self
    }

    /// Registers a controller that `"Name->action"` targets resolve against.
    /// Register controllers before the routes that reference them.
    pub fn controller(mut self, name: &str, controller: Controller) -> Self {
        self.controllers.insert(name, controller);
        self
    }

    /// Defines a named transform that patterns bind inline, `:slug:lower`.
    pub fn transform<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.callbacks.define(name, Arc::new(f));
        self
    }

    /// Sets the transform applied to every value extracted for `name`, in
    /// every route.
    pub fn param<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.params(&[name], f)
    }

    /// [`param`](Self::param) for several names sharing one transform.
    pub fn params<F>(mut self, names: &[&str], f: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        let f: Arc<dyn Fn(String) -> String + Send + Sync> = Arc::new(f);
        for name in names {
            self.callbacks.map(name, Arc::clone(&f));
        }
        self
    }

    pub fn hook<F>(mut self, hook: Hook, f: F) -> Self
    where
        F: Fn(&Request) + Send + Sync + 'static,
    {
        self.hooks.add(hook, Arc::new(f));
        self
    }

    /// Called when no route matches. Returning `Some` ends the request with
    /// that response; `None` falls through to the 404 error handler.
    pub fn not_found<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request) -> Option<Response> + Send + Sync + 'static,
    {
        self.not_found = Some(Arc::new(f));
        self
    }

    /// Handler for errors answered with `status`, e.g. 403, 404, 500.
    pub fn on_error(mut self, status: StatusCode, handler: impl Handler) -> Self {
        self.error_handlers.insert(status, handler.into_boxed_handler());
        self
    }

    /// Registers `handler` for `pattern`. Returns `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics on a configuration error; use [`add`](Self::add) to handle it.
    pub fn route(self, pattern: &str, handler: impl Handler) -> Self {
        self.register(Route::new(pattern, handler))
    }

    /// Chaining form of [`add`](Self::add).
    ///
    /// # Panics
    ///
    /// Panics on a configuration error.
    pub fn register(mut self, route: Route) -> Self {
        let pattern = route.pattern.clone();
        self.add(route)
            .unwrap_or_else(|e| panic!("invalid route `{pattern}`: {e}"));
        self
    }

    /// Compiles and appends a route.
    ///
    /// Inline `:name:transform` bindings and [`Route::param`] callbacks are
    /// registered router-wide for their parameter names.
    ///
    /// On error nothing is changed: an existing route with the same pattern
    /// keeps its action, and the route's parameter transforms are not
    /// registered.
    pub fn add(&mut self, route: Route) -> Result<(), ConfigError> {
        let Route { pattern, action, callbacks, params } = route;
        let compiled = Pattern::parse(&pattern, &self.callbacks)?;
        if self.table.contains(&compiled.key) {
            return Err(ConfigError::DuplicateRoute(pattern));
        }

        let action = match action {
            RouteAction::Handler(h) => EntryAction::Handler(h),
            RouteAction::Target(target) => {
                EntryAction::Handler(self.controllers.resolve_target(&target)?)
            }
            RouteAction::Loader(loader) => {
                if !self.controllers.contains(&loader.controller) {
                    return Err(ConfigError::UnknownController(loader.controller));
                }
                EntryAction::Loader(loader)
            }
        };
        if compiled.has_marker() != matches!(action, EntryAction::Loader(_)) {
            return Err(ConfigError::InvalidLoader(pattern));
        }

        for (name, f) in compiled.inline_transforms() {
            self.callbacks.map(name, f.clone());
        }
        for (name, f) in params {
            self.callbacks.map(&name, f);
        }
        debug!(route = %compiled.key, cli_only = compiled.cli_only, "route registered");
        self.table.push(Entry { pattern: compiled, action, callbacks });
        Ok(())
    }

    /// Compiles a loader fragment into the per-dispatch overlay.
    pub(crate) fn add_fragment(
        &self,
        overlay: &mut RouteTable,
        controller: &str,
        fragment: RouteFragment,
    ) -> Result<(), ConfigError> {
        let compiled = Pattern::parse(&fragment.pattern, &self.callbacks)?;
        if self.table.contains(&compiled.key) || overlay.contains(&compiled.key) {
            return Err(ConfigError::DuplicateRoute(fragment.pattern));
        }
        if compiled.has_marker() {
            return Err(ConfigError::InvalidLoader(fragment.pattern));
        }

        let handler = match &fragment.target {
            Target::Action(action) => self.controllers.resolve(controller, action)?,
            Target::Qualified { controller, action } => self.controllers.resolve(controller, action)?,
        };
        debug!(route = %compiled.key, "route loaded");
        overlay.push(Entry {
            pattern: compiled,
            action: EntryAction::Handler(handler),
            callbacks: Vec::new(),
        });
        Ok(())
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop(_req: Request) -> &'static str { "" }

    #[test]
    fn duplicate_pattern_is_rejected_after_normalization() {
        let mut router = Router::new();
        router.add(Route::new("/about", noop)).unwrap();
        let err = router.add(Route::new("about", noop)).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRoute(p) if p == "about"));
        assert_eq!(router.table.len(), 1);
    }

    #[test]
    fn cli_marker_does_not_make_a_new_identity() {
        let mut router = Router::new();
        router.add(Route::new("jobs", noop)).unwrap();
        assert!(router.add(Route::new("$jobs", noop)).is_err());
    }

    #[test]
    fn method_guards_make_distinct_routes() {
        let mut router = Router::new();
        router.add(Route::new("GET@item", noop)).unwrap();
        router.add(Route::new("POST@item", noop)).unwrap();
        router.add(Route::new("item", noop)).unwrap();
        assert_eq!(router.table.len(), 3);
    }

    #[test]
    fn loader_and_marker_must_agree() {
        let mut router = Router::new().controller("Admin", Controller::new());
        let err = router.add(Route::new("admin*", noop)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLoader(_)));

        let err = router.add(Route::loader("admin", "Admin", Vec::new)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLoader(_)));

        let err = router.add(Route::loader("blog*", "Blog", Vec::new)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownController(_)));

        router.add(Route::loader("admin*", "Admin", Vec::new)).unwrap();
    }

    #[test]
    fn failed_registration_does_not_register_param_transforms() {
        let mut router = Router::new();
        router.add(Route::new("a", noop)).unwrap();
        let dup = Route::new("a", noop).param("id", |v: String| v.to_uppercase());
        assert!(router.add(dup).is_err());
        assert_eq!(router.callbacks.apply("id", "x".into()), "x");
    }

    #[test]
    #[should_panic(expected = "invalid route `GRAB@x`")]
    fn chaining_panics_on_bad_routes() {
        let _ = Router::new().route("GRAB@x", noop);
    }
}
