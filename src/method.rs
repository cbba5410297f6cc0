//! HTTP method as a typed enum, and the method sets used by route guards.
//!
//! A route guarded with `GET@users` or `GET|HEAD@users` only matches requests
//! whose method is in the set. The guard tokens are parsed once, when the
//! route is registered; an unknown token is a configuration error.

use std::fmt;
use std::str::FromStr;

/// A known HTTP method (RFC 9110 plus `PATCH`).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete  => "DELETE",
            Self::Get     => "GET",
            Self::Head    => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch   => "PATCH",
            Self::Post    => "POST",
            Self::Put     => "PUT",
            Self::Trace   => "TRACE",
        }
    }

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Parses an uppercase method string (e.g. `"GET"`). Case-sensitive per RFC 9110 §9.1.
impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECT" => Ok(Self::Connect),
            "DELETE"  => Ok(Self::Delete),
            "GET"     => Ok(Self::Get),
            "HEAD"    => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "PATCH"   => Ok(Self::Patch),
            "POST"    => Ok(Self::Post),
            "PUT"     => Ok(Self::Put),
            "TRACE"   => Ok(Self::Trace),
            _         => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-empty set of methods, parsed from a `|`-separated guard token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MethodSet(u16);

impl MethodSet {
    /// Parses `"GET"` or `"GET|POST"`. Returns the offending token on failure.
    pub fn parse(guard: &str) -> Result<Self, String> {
        let mut bits = 0;
        for token in guard.split('|') {
            let method: Method = token.trim().parse().map_err(|()| token.to_owned())?;
            bits |= method.bit();
        }
        Ok(Self(bits))
    }

    pub fn contains(self, method: Method) -> bool {
        self.0 & method.bit() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_and_multiple_methods() {
        let get = MethodSet::parse("GET").unwrap();
        assert!(get.contains(Method::Get));
        assert!(!get.contains(Method::Post));

        let set = MethodSet::parse("GET|POST").unwrap();
        assert!(set.contains(Method::Get));
        assert!(set.contains(Method::Post));
        assert!(!set.contains(Method::Delete));
    }

    #[test]
    fn rejects_unknown_and_lowercase_tokens() {
        assert_eq!(MethodSet::parse("GET|GRAB"), Err("GRAB".to_owned()));
        assert_eq!(MethodSet::parse("get"), Err("get".to_owned()));
        assert_eq!(MethodSet::parse(""), Err(String::new()));
    }

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for m in [Method::Get, Method::Put, Method::Options] {
            assert_eq!(m.as_str().parse::<Method>(), Ok(m));
        }
    }
}
