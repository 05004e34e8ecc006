//! Runtime settings for database bootstrap and logging.
//!
//! # Responsibility
//! - Load settings from JSON or `TABLEMGR_*` environment variables.
//! - Provide defaults that work without any configuration.
//!
//! # Invariants
//! - Missing values fall back to defaults; malformed values are errors.
//! - A missing database path means an in-memory database.

use crate::logging::{default_log_level, init_logging, LoggingError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DATABASE: &str = "TABLEMGR_DATABASE";
pub const ENV_BUSY_TIMEOUT_MS: &str = "TABLEMGR_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "TABLEMGR_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TABLEMGR_LOG_DIR";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    InvalidValue { key: String, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid settings document: {err}"),
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for setting {key}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database file; `None` opens an in-memory database.
    pub path: Option<PathBuf>,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// Absolute log directory; `None` leaves file logging off.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parses a JSON settings document; absent fields use defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads `TABLEMGR_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = non_empty(ENV_DATABASE) {
            settings.database.path = Some(PathBuf::from(path.trim()));
        }
        if let Some(raw) = non_empty(ENV_BUSY_TIMEOUT_MS) {
            settings.database.busy_timeout_ms =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_BUSY_TIMEOUT_MS.to_string(),
                        value: raw.clone(),
                    })?;
        }
        if let Some(level) = non_empty(ENV_LOG_LEVEL) {
            settings.logging.level = level.trim().to_string();
        }
        if let Some(dir) = non_empty(ENV_LOG_DIR) {
            settings.logging.dir = Some(PathBuf::from(dir.trim()));
        }
        Ok(settings)
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns whether logging is active afterwards.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match &self.logging.dir {
            Some(dir) => {
                init_logging(&self.logging.level, dir)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
