//! Incoming request type.
//!
//! A request comes either from the HTTP server or from the CLI runner. CLI
//! requests have no method: method-guarded routes never match them, and they
//! are the only requests that may reach `$`-prefixed CLI-only routes.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::Error;
use crate::method::Method;
use crate::params::{Param, Params};

/// An incoming request.
#[derive(Clone, Debug)]
pub struct Request {
    pub(crate) method: Option<Method>,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: Params,
    pub(crate) route: Option<String>,
    pub(crate) error: Option<Arc<Error>>,
}

impl Request {
    /// An HTTP request for `target` (path plus optional `?query`).
    pub fn new(method: Method, target: &str) -> Self {
        Self::build(Some(method), target)
    }

    /// A command-line request for `target`.
    pub fn cli(target: &str) -> Self {
        Self::build(None, target)
    }

    fn build(method: Option<Method>, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((p, q)) => (p.to_owned(), Some(q.to_owned())),
            None => (target.to_owned(), None),
        };
        Self {
            method,
            path,
            query,
            headers: Vec::new(),
            body: Bytes::new(),
            params: Params::default(),
            route: None,
            error: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// `None` for CLI requests.
    pub fn method(&self) -> Option<Method> { self.method }
    pub fn is_cli(&self) -> bool { self.method.is_none() }
    /// Raw path, query string stripped.
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a single-valued path parameter.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, name: &str) -> Option<&str> {
        match self.params.get(name)? {
            Param::One(v) => Some(v),
            Param::Many(_) => None,
        }
    }

    /// Returns the values captured by a wildcard parameter (`:name+`).
    pub fn wildcard(&self, name: &str) -> Option<&[String]> {
        match self.params.get(name)? {
            Param::Many(v) => Some(v),
            Param::One(_) => None,
        }
    }

    pub fn params(&self) -> &Params { &self.params }

    /// The matched route pattern, once the router has selected one.
    pub fn route(&self) -> Option<&str> { self.route.as_deref() }

    /// The error being handled, inside an error handler.
    pub fn error(&self) -> Option<&Error> { self.error.as_deref() }

    /// The path split on `/` with each segment URL-decoded once.
    ///
    /// One leading `/` is dropped, so `/` and the empty path yield `[""]`.
    pub(crate) fn segments(&self) -> Vec<String> {
        let path = self.path.strip_prefix('/').unwrap_or(&self.path);
        path.split('/').map(decode).collect()
    }

    /// The decoded path, as shown in logs and not-found messages.
    pub(crate) fn display_path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }
}

/// Form-style decoding: `+` is a space, `%XX` an escaped byte.
fn decode(segment: &str) -> String {
    let plus = segment.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(plus.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_query_and_decodes_segments() {
        let req = Request::new(Method::Get, "/files/a%20b/c+d?x=1");
        assert_eq!(req.path(), "/files/a%20b/c+d");
        assert_eq!(req.query(), Some("x=1"));
        assert_eq!(req.segments(), ["files", "a b", "c d"]);
        assert_eq!(req.display_path(), "/files/a b/c d");
    }

    #[test]
    fn root_and_empty_path_are_the_index() {
        assert_eq!(Request::new(Method::Get, "/").segments(), [""]);
        assert_eq!(Request::cli("").segments(), [""]);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(Method::Get, "/").with_header("X-Token", "abc");
        assert_eq!(req.header("x-token"), Some("abc"));
        assert_eq!(req.header("missing"), None);
    }
}
