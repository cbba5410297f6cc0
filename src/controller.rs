//! Controllers: named groups of actions.
//!
//! Routes can point at `"Controller->action"` instead of a handler value.
//! The target is resolved when the route is registered, so a typo in a
//! controller or action name fails at startup rather than on first request.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::handler::{BoxedHandler, Handler};

/// A named set of actions.
///
/// ```rust
/// use eco::{Controller, Request};
///
/// async fn list(_req: Request) -> &'static str { "all users" }
/// async fn edit(req: Request) -> String {
///     format!("editing {}", req.param("id").unwrap_or("?"))
/// }
///
/// let users = Controller::new()
///     .action("list", list)
///     .action("edit", edit);
/// ```
#[derive(Clone, Default)]
pub struct Controller {
    actions: HashMap<String, BoxedHandler>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(mut self, name: &str, handler: impl Handler) -> Self {
        self.actions.insert(name.to_owned(), handler.into_boxed_handler());
        self
    }
}

#[derive(Default)]
pub(crate) struct Controllers(HashMap<String, Controller>);

impl Controllers {
    pub(crate) fn insert(&mut self, name: &str, controller: Controller) {
        self.0.insert(name.to_owned(), controller);
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Resolves a `"Controller->action"` string.
    pub(crate) fn resolve_target(&self, target: &str) -> Result<BoxedHandler, ConfigError> {
        let (controller, action) = target
            .split_once("->")
            .filter(|(c, a)| !c.is_empty() && !a.is_empty())
            .ok_or_else(|| ConfigError::InvalidTarget(target.to_owned()))?;
        self.resolve(controller, action)
    }

    pub(crate) fn resolve(&self, controller: &str, action: &str) -> Result<BoxedHandler, ConfigError> {
        let c = self.0
            .get(controller)
            .ok_or_else(|| ConfigError::UnknownController(controller.to_owned()))?;
        c.actions.get(action).cloned().ok_or_else(|| ConfigError::UnknownAction {
            controller: controller.to_owned(),
            action: action.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Request;

    async fn noop(_req: Request) -> &'static str { "" }

    fn controllers() -> Controllers {
        let mut c = Controllers::default();
        c.insert("Admin", Controller::new().action("edit", noop));
        c
    }

    #[test]
    fn resolves_qualified_targets() {
        assert!(controllers().resolve_target("Admin->edit").is_ok());
    }

    #[test]
    fn reports_each_kind_of_bad_target() {
        let c = controllers();
        assert!(matches!(c.resolve_target("Admin.edit"), Err(ConfigError::InvalidTarget(_))));
        assert!(matches!(c.resolve_target("->edit"), Err(ConfigError::InvalidTarget(_))));
        assert!(matches!(c.resolve_target("Blog->edit"), Err(ConfigError::UnknownController(_))));
        assert!(matches!(
            c.resolve_target("Admin->delete"),
            Err(ConfigError::UnknownAction { action, .. }) if action == "delete"
        ));
    }
}
