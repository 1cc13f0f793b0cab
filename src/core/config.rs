//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Taskgate reads a single TOML file describing the downstream task API
//! and a few client-side policies:
//!
//! ```toml
//! api_base_url = "https://tasks.example.com/api/tasks"
//! resource = "api://tasklist"
//! request_timeout_secs = 30
//! consent_ttl_minutes = 60
//! ```
//!
//! # Locations
//!
//! Searched in order:
//! 1. Explicit path passed to [`Config::load`]
//! 2. `$TASKGATE_CONFIG` if set
//!
//! A missing file yields the defaults; a malformed file is an error.
//! Values are validated after parsing.
//!
//! # Example
//!
//! ```no_run
//! use taskgate::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/etc/taskgate.toml"))).unwrap();
//! println!("API base: {}", config.api_base_url);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV_VAR: &str = "TASKGATE_CONFIG";

/// Default per-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default consent marker lifetime in minutes.
///
/// Matches the lifetime of the consent-prompt cookie the sign-in
/// collaborator consumes.
const DEFAULT_CONSENT_TTL_MINUTES: i64 = 60;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Client configuration.
///
/// All fields have defaults except the API base URL and the resource
/// identifier, which default to empty and fail [`Config::validate`]
/// since there is no sensible universal default for either.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the task API (the collection endpoint).
    pub api_base_url: String,

    /// Resource identifier tokens must be valid for.
    pub resource: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Consent marker lifetime in minutes.
    pub consent_ttl_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            resource: String::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            consent_ttl_minutes: DEFAULT_CONSENT_TTL_MINUTES,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Resolution order: explicit `path`, then `$TASKGATE_CONFIG`. If
    /// neither names an existing file, defaults are returned (and will
    /// fail validation until the caller fills in the API base URL).
    ///
    /// # Errors
    ///
    /// - `ConfigError::ReadError` if a named file cannot be read
    /// - `ConfigError::ParseError` if the file is not valid TOML
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let candidate = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));

        let Some(candidate) = candidate else {
            return Ok(Self::default());
        };

        if !candidate.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&candidate).map_err(|source| ConfigError::ReadError {
            path: candidate.clone(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: candidate,
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::InvalidValue(
                "api_base_url must not be empty".into(),
            ));
        }
        if self.resource.is_empty() {
            return Err(ConfigError::InvalidValue(
                "resource must not be empty".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.consent_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue(
                "consent_ttl_minutes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Per-request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_when_no_path_given() {
        let config = Config::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.consent_ttl_minutes, 60);
        assert!(config.api_base_url.is_empty());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/taskgate.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn loads_full_config() {
        let file = write_config(
            r#"
            api_base_url = "https://tasks.example.com/api/tasks"
            resource = "api://tasklist"
            request_timeout_secs = 5
            consent_ttl_minutes = 15
            "#,
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.api_base_url, "https://tasks.example.com/api/tasks");
        assert_eq!(config.resource, "api://tasklist");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.consent_ttl_minutes, 15);
        config.validate().unwrap();
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let file = write_config(
            r#"
            api_base_url = "https://tasks.example.com/api/tasks"
            resource = "api://tasklist"
            "#,
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.consent_ttl_minutes, 60);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let file = write_config("api_base_url = [not toml");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config(
            r#"
            api_base_url = "https://tasks.example.com"
            resource = "api://tasklist"
            surprise = true
            "#,
        );
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let config = Config {
            resource: "api://tasklist".into(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api_base_url"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = Config {
            api_base_url: "https://tasks.example.com".into(),
            resource: "api://tasklist".into(),
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
