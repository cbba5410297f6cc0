//! Route pattern compiler and per-segment matcher.
//!
//! A pattern is compiled once, at registration. Grammar, per `/`-separated
//! segment:
//!
//! | Segment            | Meaning                                               |
//! |--------------------|-------------------------------------------------------|
//! | `users`            | literal, must equal the decoded path segment          |
//! | `admin*`           | loader marker: fires the route's loader on `admin`    |
//! | `:id`              | required parameter                                    |
//! | `:q?`              | optional parameter                                    |
//! | `:path+`           | wildcard, captures this and all remaining segments    |
//! | `:slug:lower`      | parameter bound to the named transform `lower`        |
//! | `:id@\d+`          | parameter constrained by a fully-anchored regex       |
//!
//! Suffixes combine in the order `:name[?|+][:transform][@regex]`. Everything
//! after the first `@` is regex, so the regex may contain `:` and `@`.
//!
//! The whole pattern may be prefixed with `$` (CLI-only route) and its first
//! segment with a method guard, `GET@users/:id` or `GET|HEAD@/users/:id`.

use regex::Regex;

use crate::error::ConfigError;
use crate::method::{Method, MethodSet};
use crate::params::{Param, ParamCallbacks, Params, Transform};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParamKind {
    Required,
    Optional,
    Wildcard,
}

pub(crate) enum Segment {
    Literal(String),
    /// `prefix*`. Kept whole so a path segment spelled `prefix*` still
    /// matches literally.
    Marker { literal: String, prefix: String },
    Param {
        name: String,
        kind: ParamKind,
        regex: Option<Regex>,
        /// Inline `:name:transform` binding. Also registered for `name`
        /// router-wide when the route is added to the table.
        transform: Option<Transform>,
    },
}

/// A compiled route pattern.
pub(crate) struct Pattern {
    /// Route identity: the pattern without leading `/` and `$`.
    pub(crate) key: String,
    pub(crate) cli_only: bool,
    pub(crate) methods: Option<MethodSet>,
    pub(crate) segments: Vec<Segment>,
}

/// Outcome of trying one candidate route against a request.
#[derive(Debug, PartialEq)]
pub(crate) enum Attempt {
    Matched(Params),
    Miss,
    /// A loader marker's prefix equals the request segment.
    Loader,
}

impl Pattern {
    pub(crate) fn parse(raw: &str, callbacks: &ParamCallbacks) -> Result<Self, ConfigError> {
        let mut rest = raw.trim_start_matches('/');
        let cli_only = match rest.strip_prefix('$') {
            Some(r) => {
                rest = r.trim_start_matches('/');
                true
            }
            None => false,
        };

        let first = rest.split('/').next().unwrap_or_default();
        let (methods, body, key) = match first.split_once('@') {
            Some((token, _)) if !first.starts_with(':') => {
                let set = MethodSet::parse(token).map_err(|token| ConfigError::InvalidMethod {
                    route: raw.to_owned(),
                    token,
                })?;
                let body = rest[token.len() + 1..].trim_start_matches('/');
                (Some(set), body, format!("{token}@{body}"))
            }
            _ => (None, rest, rest.to_owned()),
        };

        let mut segments = Vec::new();
        if !body.is_empty() {
            let parts: Vec<&str> = body.split('/').collect();
            for (i, part) in parts.iter().enumerate() {
                let segment = parse_segment(raw, part, callbacks)?;
                if let Segment::Param { kind: ParamKind::Wildcard, .. } = segment {
                    if i + 1 != parts.len() {
                        return Err(ConfigError::WildcardNotLast(raw.to_owned()));
                    }
                }
                segments.push(segment);
            }
        }

        Ok(Self { key, cli_only, methods, segments })
    }

    /// Parameter names carrying an inline `:name:transform` binding.
    pub(crate) fn inline_transforms(&self) -> impl Iterator<Item = (&str, &Transform)> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, transform: Some(f), .. } => Some((name.as_str(), f)),
            _ => None,
        })
    }

    pub(crate) fn has_marker(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Marker { .. }))
    }

    /// Tries this pattern against the decoded request segments.
    ///
    /// `method` is `None` for CLI requests, which never pass a method guard.
    pub(crate) fn attempt(
        &self,
        request: &[String],
        method: Option<Method>,
        callbacks: &ParamCallbacks,
    ) -> Attempt {
        if let Some(set) = self.methods {
            if !method.is_some_and(|m| set.contains(m)) {
                return Attempt::Miss;
            }
        }

        if is_index(request) {
            if self.segments.is_empty() {
                return Attempt::Matched(Params::default());
            }
            return Attempt::Miss;
        }

        let mut params = Params::default();
        for (k, segment) in self.segments.iter().enumerate() {
            let value = request.get(k).map(String::as_str);
            match segment {
                Segment::Literal(lit) => {
                    if value != Some(lit.as_str()) {
                        return Attempt::Miss;
                    }
                }
                Segment::Marker { literal, prefix } => {
                    if value == Some(prefix.as_str()) {
                        return Attempt::Loader;
                    }
                    if value != Some(literal.as_str()) {
                        return Attempt::Miss;
                    }
                }
                Segment::Param { name, kind, regex, transform } => {
                    let apply = |v: String| match transform {
                        Some(f) => f(v),
                        None => callbacks.apply(name, v),
                    };
                    let Some(value) = value.filter(|v| !v.is_empty()) else {
                        if *kind == ParamKind::Optional {
                            continue;
                        }
                        return Attempt::Miss;
                    };

                    if *kind == ParamKind::Wildcard {
                        let mut values = Vec::with_capacity(request.len() - k);
                        for v in &request[k..] {
                            if !accepts(regex.as_ref(), v) {
                                return Attempt::Miss;
                            }
                            values.push(apply(v.clone()));
                        }
                        params.set(name, Param::Many(values));
                        return Attempt::Matched(params);
                    }

                    if !accepts(regex.as_ref(), value) {
                        return Attempt::Miss;
                    }
                    params.set(name, Param::One(apply(value.to_owned())));
                }
            }
        }

        // Fewer request segments can only get here through optional params.
        if request.len() > self.segments.len() {
            return Attempt::Miss;
        }
        Attempt::Matched(params)
    }
}

// ── Segment helpers ──────────────────────────────────────────────────────────

/// An empty first segment selects the index route.
pub(crate) fn is_index(request: &[String]) -> bool {
    request.first().is_none_or(|s| s.is_empty())
}

fn accepts(regex: Option<&Regex>, value: &str) -> bool {
    regex.is_none_or(|re| re.is_match(value))
}

fn parse_segment(
    route: &str,
    part: &str,
    callbacks: &ParamCallbacks,
) -> Result<Segment, ConfigError> {
    let Some(param) = part.strip_prefix(':') else {
        return Ok(match part.strip_suffix('*') {
            Some(prefix) => Segment::Marker { literal: part.to_owned(), prefix: prefix.to_owned() },
            None => Segment::Literal(part.to_owned()),
        });
    };

    let (head, regex) = match param.split_once('@') {
        Some((head, re)) if !re.is_empty() => (head, Some(re)),
        Some((head, _)) => (head, None),
        None => (param, None),
    };
    let (head, transform) = match head.rsplit_once(':') {
        Some((head, t)) => (head, Some(t)),
        None => (head, None),
    };
    let (name, kind) = if let Some(n) = head.strip_suffix('+') {
        (n, ParamKind::Wildcard)
    } else if let Some(n) = head.strip_suffix('?') {
        (n, ParamKind::Optional)
    } else {
        (head, ParamKind::Required)
    };

    if name.is_empty() {
        return Err(ConfigError::EmptyParam(route.to_owned()));
    }

    let regex = regex
        .map(|re| Regex::new(&format!("^(?:{re})$")))
        .transpose()
        .map_err(|source| ConfigError::InvalidRegex { route: route.to_owned(), source })?;

    let transform = transform
        .filter(|t| !t.is_empty())
        .map(|t| {
            callbacks.named(t).ok_or_else(|| ConfigError::UnknownTransform {
                route: route.to_owned(),
                transform: t.to_owned(),
            })
        })
        .transpose()?;

    Ok(Segment::Param { name: name.to_owned(), kind, regex, transform })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn segs(path: &str) -> Vec<String> {
        path.split('/').map(str::to_owned).collect()
    }

    fn parse(raw: &str) -> Pattern {
        Pattern::parse(raw, &ParamCallbacks::default()).unwrap()
    }

    fn matched(p: &Pattern, path: &str) -> Option<Params> {
        match p.attempt(&segs(path), Some(Method::Get), &ParamCallbacks::default()) {
            Attempt::Matched(params) => Some(params),
            _ => None,
        }
    }

    #[test]
    fn normalizes_leading_slash_and_cli_marker() {
        let p = parse("/$jobs/run");
        assert!(p.cli_only);
        assert_eq!(p.key, "jobs/run");

        let p = parse("//about");
        assert!(!p.cli_only);
        assert_eq!(p.key, "about");
    }

    #[test]
    fn cli_marker_may_precede_the_leading_slash() {
        for raw in ["$/jobs/run", "/$jobs/run", "$jobs/run", "/$/jobs/run"] {
            let p = parse(raw);
            assert!(p.cli_only, "{raw}");
            assert_eq!(p.key, "jobs/run", "{raw}");
        }
        let p = parse("$/jobs/run");
        let cb = ParamCallbacks::default();
        assert!(matches!(p.attempt(&segs("jobs/run"), None, &cb), Attempt::Matched(_)));
    }

    #[test]
    fn method_guard_is_part_of_the_key() {
        let p = parse("GET|POST@/item/:id");
        assert_eq!(p.key, "GET|POST@item/:id");
        assert_eq!(p.segments.len(), 2);
        assert!(p.methods.unwrap().contains(Method::Post));
    }

    #[test]
    fn unknown_method_token_is_rejected() {
        let err = Pattern::parse("FETCH@item", &ParamCallbacks::default()).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidMethod { token, .. } if token == "FETCH"));
    }

    #[test]
    fn regex_may_contain_colons_and_at_signs() {
        let p = parse("mail/:addr@[a-z]+@[a-z]+\\.com");
        assert!(matched(&p, "mail/bob@example.com").is_some());
        assert!(matched(&p, "mail/bob").is_none());
    }

    #[test]
    fn regex_must_match_the_whole_segment() {
        let p = parse("users/:id@\\d+");
        assert!(matched(&p, "users/42").is_some());
        assert!(matched(&p, "users/42abc").is_none());
        assert!(matched(&p, "users/abc").is_none());
    }

    #[test]
    fn invalid_regex_is_a_config_error() {
        let err = Pattern::parse("users/:id@(", &ParamCallbacks::default()).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidRegex { .. }));
    }

    #[test]
    fn wildcard_must_be_last() {
        let err = Pattern::parse("files/:path+/edit", &ParamCallbacks::default()).err().unwrap();
        assert!(matches!(err, ConfigError::WildcardNotLast(_)));
    }

    #[test]
    fn unnamed_parameter_is_rejected() {
        let err = Pattern::parse("files/:+", &ParamCallbacks::default()).err().unwrap();
        assert!(matches!(err, ConfigError::EmptyParam(_)));
    }

    #[test]
    fn inline_transform_must_be_registered() {
        let err = Pattern::parse("tags/:tag:lower", &ParamCallbacks::default()).err().unwrap();
        assert!(matches!(err, ConfigError::UnknownTransform { transform, .. } if transform == "lower"));

        let mut cb = ParamCallbacks::default();
        cb.define("lower", Arc::new(|v: String| v.to_lowercase()));
        let p = Pattern::parse("tags/:tag?:lower@\\w+", &cb).unwrap();
        assert!(matches!(
            &p.segments[1],
            Segment::Param { kind: ParamKind::Optional, regex: Some(_), transform: Some(_), .. }
        ));
        match p.attempt(&segs("tags/RUST"), None, &cb) {
            Attempt::Matched(params) => {
                assert_eq!(params.get("tag"), Some(&Param::One("rust".into())));
            }
            other => panic!("expected a match, got {other:?}"),
        }
        let inline: Vec<_> = p.inline_transforms().map(|(name, _)| name).collect();
        assert_eq!(inline, ["tag"]);
    }

    #[test]
    fn longer_request_does_not_match_shorter_pattern() {
        let p = parse("users/:id");
        assert!(matched(&p, "users/1/edit").is_none());
        assert!(matched(&p, "users").is_none());
        assert!(matched(&p, "users/").is_none());
    }

    #[test]
    fn marker_reports_loader_on_prefix_only() {
        let p = parse("admin*");
        let cb = ParamCallbacks::default();
        assert_eq!(p.attempt(&segs("admin"), None, &cb), Attempt::Loader);
        assert_eq!(p.attempt(&segs("other"), None, &cb), Attempt::Miss);
        assert!(matches!(p.attempt(&segs("admin*"), None, &cb), Attempt::Matched(_)));
    }

    #[test]
    fn index_only_matches_empty_pattern() {
        assert!(matched(&parse("/"), "").is_some());
        assert!(matched(&parse("about"), "").is_none());
    }
}
