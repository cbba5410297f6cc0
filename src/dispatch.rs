//! Request dispatch: matching, route loaders, the not-found chain and the
//! error channel.
//!
//! ```text
//! before hooks
//!   └─ match ──┬─ hit  ─→ middle hooks → route callbacks → action ─┐
//!              └─ miss ─→ middle hooks → not-found callback ───────┤
//!                           └─ unhandled → error channel (404) ────┤
//! after hooks  ←───────────────────────────────────────────────────┘
//! ```
//!
//! Everything a dispatch mutates is local to it: the overlay table that
//! loaders append to, the set of loaders already fired, and the error
//! channel's double-error guard. The shared [`Router`] is only read.

use std::collections::HashSet;
use std::sync::Arc;

use http::StatusCode;
use tracing::{debug, error};

use crate::error::{ConfigError, Error};
use crate::hook::{Flow, Hook};
use crate::method::Method;
use crate::params::Params;
use crate::pattern::Attempt;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::table::{Entry, EntryAction, RouteTable};

impl Router {
    /// Dispatches one request and returns the final response.
    ///
    /// The after hooks have run by the time this returns, whichever way the
    /// request ended.
    pub async fn handle(&self, mut req: Request) -> Response {
        self.hooks.fire(Hook::Before, &req);
        let mut errors = ErrorChannel { router: self, handling: false };
        let response = self.run(&mut req, &mut errors).await;
        self.hooks.fire(Hook::After, &req);
        response
    }

    async fn run(&self, req: &mut Request, errors: &mut ErrorChannel<'_>) -> Response {
        let segments = req.segments();
        let mut overlay = RouteTable::default();

        let found = match self.find(&segments, req.method, &mut overlay) {
            Ok(found) => found,
            Err(e) => return errors.report(e.into(), req).await,
        };
        let found = found.filter(|(entry, _)| {
            let allowed = !entry.pattern.cli_only || req.is_cli();
            if !allowed {
                debug!(route = %entry.pattern.key, "CLI-only route requested outside CLI");
            }
            allowed
        });

        let Some((entry, params)) = found else {
            if let Some(not_found) = &self.not_found {
                self.hooks.fire(Hook::Middle, req);
                if let Some(res) = not_found(req) {
                    debug!(path = %req.display_path(), "handled by not-found callback");
                    return errors.settle(res, req).await;
                }
            }
            debug!(path = %req.display_path(), "no route for request");
            return errors.report(Error::NotFound(req.display_path()), req).await;
        };

        req.route = Some(format!("/{}", entry.pattern.key));
        req.params = params;
        self.hooks.fire(Hook::Middle, req);

        for callback in &entry.callbacks {
            if let Flow::Stop(res) = callback(req) {
                debug!(route = %entry.pattern.key, "stopped by route callback");
                return errors.settle(res, req).await;
            }
        }

        let EntryAction::Handler(handler) = &entry.action else {
            // `find` never returns loader entries.
            return errors.report(Error::NotFound(req.display_path()), req).await;
        };
        debug!(route = %entry.pattern.key, "calling route action");
        let res = handler.call(req.clone()).await;
        errors.settle(res, req).await
    }

    /// First route, in registration order, that matches `segments`.
    ///
    /// Hitting a loader marker fires that loader (once per dispatch),
    /// appends its routes to `overlay`, and rescans from the top.
    fn find(
        &self,
        segments: &[String],
        method: Option<Method>,
        overlay: &mut RouteTable,
    ) -> Result<Option<(Arc<Entry>, Params)>, ConfigError> {
        let mut fired: HashSet<String> = HashSet::new();

        'scan: loop {
            let base = self.table.len();
            for i in 0..base + overlay.len() {
                let entry = match self.table.get(i) {
                    Some(e) => Arc::clone(e),
                    None => match overlay.get(i - base) {
                        Some(e) => Arc::clone(e),
                        None => break,
                    },
                };

                match entry.pattern.attempt(segments, method, &self.callbacks) {
                    Attempt::Matched(params) => {
                        if matches!(entry.action, EntryAction::Loader(_)) {
                            continue;
                        }
                        debug!(route = %entry.pattern.key, "route matched");
                        return Ok(Some((entry, params)));
                    }
                    Attempt::Loader => {
                        let EntryAction::Loader(loader) = &entry.action else { continue };
                        if !fired.insert(entry.pattern.key.clone()) {
                            continue;
                        }
                        let fragments = (loader.provider)();
                        debug!(
                            route = %entry.pattern.key,
                            routes = fragments.len(),
                            "route loader fired",
                        );
                        for fragment in fragments {
                            self.add_fragment(overlay, &loader.controller, fragment)?;
                        }
                        continue 'scan;
                    }
                    Attempt::Miss => {}
                }
            }
            return Ok(None);
        }
    }
}

// ── Error channel ────────────────────────────────────────────────────────────

/// Per-dispatch error reporting.
struct ErrorChannel<'a> {
    router: &'a Router,
    /// Set by the first report; a second report short-circuits.
    handling: bool,
}

impl ErrorChannel<'_> {
    /// Passes a response through, or reports the error it carries.
    async fn settle(&mut self, mut res: Response, req: &mut Request) -> Response {
        match res.failure.take() {
            Some(e) => self.report(e, req).await,
            None => res,
        }
    }

    /// Logs `error`, records it on the request and renders the error handler
    /// registered for its status.
    async fn report(&mut self, err: Error, req: &mut Request) -> Response {
        let status = err.status_code();
        if self.handling {
            error!(category = err.category(), "error while handling an error: {err}");
            return Response::status(status);
        }
        self.handling = true;

        if self.router.error_level.logs(status) {
            error!(status = status.as_u16(), category = err.category(), "{err}");
        }
        req.error = Some(Arc::new(err));

        let Some(handler) = self.router.error_handlers.get(&status) else {
            return fallback(status);
        };
        let mut res = handler.call(req.clone()).await;
        if let Some(second) = res.failure.take() {
            error!(category = second.category(), "error handler failed: {second}");
            return Response::status(status);
        }
        res.status = status;
        res
    }
}

fn fallback(status: StatusCode) -> Response {
    Response::builder()
        .status(status)
        .text(status.canonical_reason().unwrap_or_default())
}
