//! Extracted route parameters and the parameter-callback registry.

use std::collections::HashMap;
use std::sync::Arc;

/// A value transform applied to every extracted parameter value.
pub type Transform = Arc<dyn Fn(String) -> String + Send + Sync + 'static>;

/// One extracted parameter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Param {
    /// A `:name`, `:name?` or `:name@regex` segment.
    One(String),
    /// A `:name+` wildcard: this and every following path segment.
    Many(Vec<String>),
}

/// Parameters of a matched route, in the order they were first encountered.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Params(Vec<(String, Param)>);

impl Params {
    /// Sets `name`, replacing an earlier value in place.
    pub(crate) fn set(&mut self, name: &str, value: Param) {
        match self.0.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name.to_owned(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Parameter name → transform.
///
/// Shared by every route: a transform registered for `id` applies to `:id`
/// in all patterns, including each element of an `:id+` wildcard.
#[derive(Clone, Default)]
pub(crate) struct ParamCallbacks {
    by_param: HashMap<String, Transform>,
    named: HashMap<String, Transform>,
}

impl ParamCallbacks {
    /// `?` and `+` are stripped so `:q?` and `:q` share one entry.
    pub(crate) fn map(&mut self, param: &str, transform: Transform) {
        let key: String = param.chars().filter(|c| !matches!(c, '?' | '+')).collect();
        self.by_param.insert(key, transform);
    }

    pub(crate) fn define(&mut self, name: &str, transform: Transform) {
        self.named.insert(name.to_owned(), transform);
    }

    pub(crate) fn named(&self, name: &str) -> Option<Transform> {
        self.named.get(name).cloned()
    }

    pub(crate) fn apply(&self, param: &str, value: String) -> String {
        match self.by_param.get(param) {
            Some(f) => f(value),
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_first_position() {
        let mut p = Params::default();
        p.set("a", Param::One("1".into()));
        p.set("b", Param::One("2".into()));
        p.set("a", Param::One("3".into()));

        let order: Vec<_> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ["a", "b"]);
        assert_eq!(p.get("a"), Some(&Param::One("3".into())));
    }

    #[test]
    fn mapping_strips_optional_and_wildcard_markers() {
        let mut cb = ParamCallbacks::default();
        cb.map("q?", Arc::new(|v: String| v.to_uppercase()));
        assert_eq!(cb.apply("q", "cats".into()), "CATS");
        assert_eq!(cb.apply("other", "cats".into()), "cats");
    }
}
