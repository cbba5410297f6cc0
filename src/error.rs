//! Unified error types.
//!
//! Two layers:
//!
//! - [`ConfigError`] — structural misconfiguration: duplicate routes, bad
//!   controller references, invalid method tokens, unparseable config files.
//!   These are found at registration time (returned from
//!   [`Router::add`](crate::Router::add)) or, for route loaders, at the first
//!   dispatch that fires the loader.
//! - [`Error`] — anything that ends a request through the error channel. Its
//!   [`status`](Error::status) selects the error handler that renders the
//!   response.

use std::fmt;

use http::StatusCode;

/// A structural misconfiguration of the router or its settings.
#[derive(Debug)]
pub enum ConfigError {
    /// The same normalized pattern was registered twice.
    DuplicateRoute(String),
    /// A `METHOD@` guard named a method that does not exist.
    InvalidMethod { route: String, token: String },
    /// A `:name@regex` constraint failed to compile.
    InvalidRegex { route: String, source: regex::Error },
    /// A parameter segment with no name (`:`, `:?`, `:+`).
    EmptyParam(String),
    /// A `:name+` segment followed by more segments.
    WildcardNotLast(String),
    /// A `:name:transform` binding referenced an unregistered transform.
    UnknownTransform { route: String, transform: String },
    /// A controller target that is not of the form `Controller->action`.
    InvalidTarget(String),
    UnknownController(String),
    UnknownAction { controller: String, action: String },
    /// A loader marker (`segment*`) on a plain route, or a loader route
    /// without exactly one marker.
    InvalidLoader(String),
    /// Reading a configuration file failed.
    Io(std::io::Error),
    /// A configuration file is not valid TOML for [`Config`](crate::Config).
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRoute(route) => write!(f, "cannot redeclare route `{route}`"),
            Self::InvalidMethod { route, token } => {
                write!(f, "invalid HTTP method `{token}` in route `{route}`")
            }
            Self::InvalidRegex { route, source } => {
                write!(f, "invalid parameter regex in route `{route}`: {source}")
            }
            Self::EmptyParam(route) => write!(f, "unnamed parameter in route `{route}`"),
            Self::WildcardNotLast(route) => {
                write!(f, "wildcard parameter must be the last segment of route `{route}`")
            }
            Self::UnknownTransform { route, transform } => {
                write!(f, "route `{route}` binds unknown transform `{transform}`")
            }
            Self::InvalidTarget(target) => {
                write!(f, "invalid route target `{target}`, expected `Controller->action`")
            }
            Self::UnknownController(name) => write!(f, "controller `{name}` is not registered"),
            Self::UnknownAction { controller, action } => {
                write!(f, "controller `{controller}` has no action `{action}`")
            }
            Self::InvalidLoader(route) => {
                write!(f, "route `{route}` mixes loader markers and non-loader actions")
            }
            Self::Io(e) => write!(f, "config io: {e}"),
            Self::Parse(e) => write!(f, "config parse: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// The error type that ends a request through the error channel.
#[derive(Debug)]
pub enum Error {
    /// Reported as `500 Internal Server Error`.
    Config(ConfigError),
    /// No route matched the request path.
    NotFound(String),
    /// An explicit status raised by a handler, e.g. `403 Forbidden`.
    Status { code: StatusCode, message: String },
    /// Binding or accepting on the listener failed.
    Io(std::io::Error),
}

impl Error {
    /// Builds an error that the channel answers with `code`.
    pub fn status(code: StatusCode, message: impl Into<String>) -> Self {
        Self::Status { code, message: message.into() }
    }

    /// The HTTP status this error is answered with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Status { code, .. } => *code,
            Self::Config(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log category, recorded alongside the message.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::NotFound(_) => "router",
            Self::Status { .. } => "app",
            Self::Io(_) => "server",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::NotFound(path) => write!(f, "not found: `{path}`"),
            Self::Status { code, message } => write!(f, "{}: {message}", code.as_u16()),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
