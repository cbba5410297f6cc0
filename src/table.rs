//! The route table: compiled routes in registration order.

use std::collections::HashSet;
use std::sync::Arc;

use crate::handler::BoxedHandler;
use crate::hook::RouteCallback;
use crate::pattern::Pattern;
use crate::route::Loader;

pub(crate) enum EntryAction {
    Handler(BoxedHandler),
    Loader(Loader),
}

/// A compiled, ready-to-match route.
pub(crate) struct Entry {
    pub(crate) pattern: Pattern,
    pub(crate) action: EntryAction,
    pub(crate) callbacks: Vec<RouteCallback>,
}

/// Append-only list of routes, unique by pattern key.
///
/// The router owns one table built at startup; each dispatch owns a second,
/// initially empty, table that receives the routes its loaders produce.
#[derive(Default)]
pub(crate) struct RouteTable {
    entries: Vec<Arc<Entry>>,
    keys: HashSet<String>,
}

impl RouteTable {
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Callers check [`contains`](Self::contains) first.
    pub(crate) fn push(&mut self, entry: Entry) {
        self.keys.insert(entry.pattern.key.clone());
        self.entries.push(Arc::new(entry));
    }

    pub(crate) fn get(&self, i: usize) -> Option<&Arc<Entry>> {
        self.entries.get(i)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
