//! Settings, loadable from TOML.
//!
//! ```toml
//! [server]
//! addr = "0.0.0.0:3000"
//!
//! [log]
//! # "server" logs only 5xx errors, "all" logs every reported error,
//! # "none" logs nothing.
//! error_level = "all"
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LogConfig {
    #[serde(default)]
    pub error_level: ErrorLevel,
}

/// Which errors reported through the error channel are logged.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    /// Only 5xx errors.
    Server,
    #[default]
    All,
    None,
}

impl ErrorLevel {
    pub(crate) fn logs(self, status: http::StatusCode) -> bool {
        match self {
            Self::Server => status.is_server_error(),
            Self::All => true,
            Self::None => false,
        }
    }
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_owned()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.addr, "127.0.0.1:3000");
        assert_eq!(config.log.error_level, ErrorLevel::All);
    }

    #[test]
    fn reads_all_sections() {
        let config = Config::from_toml(
            "[server]\naddr = \"0.0.0.0:8080\"\n[log]\nerror_level = \"server\"\n",
        )
        .unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.log.error_level, ErrorLevel::Server);
    }

    #[test]
    fn rejects_unknown_error_level() {
        let err = Config::from_toml("[log]\nerror_level = \"loud\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load("/nonexistent/eco.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn error_level_filters_by_status() {
        assert!(ErrorLevel::Server.logs(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!ErrorLevel::Server.logs(StatusCode::NOT_FOUND));
        assert!(ErrorLevel::All.logs(StatusCode::NOT_FOUND));
        assert!(!ErrorLevel::None.logs(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
