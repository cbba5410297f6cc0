//! Lifecycle hooks and route callbacks.
//!
//! | Hook              | Fires                                                   |
//! |-------------------|---------------------------------------------------------|
//! | [`Hook::Before`]  | once, before the router looks at the path               |
//! | [`Hook::Middle`]  | right before the action, or before the not-found callback |
//! | [`Hook::After`]   | once, as the request terminates, on every exit path     |
//!
//! Hooks observe; they cannot end a request. Route callbacks can, by
//! returning [`Flow::Stop`].

use std::sync::Arc;

use tracing::debug;

use crate::request::Request;
use crate::response::Response;

/// A hook point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Hook {
    Before,
    Middle,
    After,
}

/// What a route callback wants the dispatcher to do next.
pub enum Flow {
    Continue,
    /// End the request with this response. The action is not called; the
    /// after hooks still run.
    Stop(Response),
}

pub(crate) type HookFn = Arc<dyn Fn(&Request) + Send + Sync + 'static>;
pub(crate) type RouteCallback = Arc<dyn Fn(&Request) -> Flow + Send + Sync + 'static>;
pub(crate) type NotFoundFn = Arc<dyn Fn(&Request) -> Option<Response> + Send + Sync + 'static>;

#[derive(Clone, Default)]
pub(crate) struct Hooks {
    before: Vec<HookFn>,
    middle: Vec<HookFn>,
    after: Vec<HookFn>,
}

impl Hooks {
    pub(crate) fn add(&mut self, hook: Hook, f: HookFn) {
        match hook {
            Hook::Before => self.before.push(f),
            Hook::Middle => self.middle.push(f),
            Hook::After => self.after.push(f),
        }
        debug!(?hook, "hook registered");
    }

    pub(crate) fn fire(&self, hook: Hook, req: &Request) {
        let fns = match hook {
            Hook::Before => &self.before,
            Hook::Middle => &self.middle,
            Hook::After => &self.after,
        };
        if !fns.is_empty() {
            debug!(?hook, count = fns.len(), "calling hook");
        }
        for f in fns {
            f(req);
        }
    }
}
