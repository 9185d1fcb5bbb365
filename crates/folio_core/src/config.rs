//! Process configuration resolved from environment variables.
//!
//! # Responsibility
//! - Map `FOLIO_*` variables onto typed settings for storage, seeding and
//!   logging.
//!
//! # Invariants
//! - Unset and blank variables fall back to defaults.
//! - Present but malformed values are rejected, never ignored.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir, LoggingConfig};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "FOLIO_DB_PATH";
pub const ENV_SEED_DIR: &str = "FOLIO_SEED_DIR";
pub const ENV_LOG_LEVEL: &str = "FOLIO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FOLIO_LOG_DIR";
pub const ENV_LOG_STDERR: &str = "FOLIO_LOG_STDERR";

/// Configuration error for one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid value `{}` for {}: {}",
            self.value, self.key, self.reason
        )
    }
}

impl Error for ConfigError {}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file. `None` selects an in-memory store.
    pub database_path: Option<PathBuf>,
    /// Directory holding `categories.json` and `posts.json`.
    pub seed_dir: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let level = match read(ENV_LOG_LEVEL) {
            Some(value) => checked(ENV_LOG_LEVEL, value, normalize_level)?,
            None => default_log_level(),
        };
        let log_dir = read(ENV_LOG_DIR)
            .map(|value| checked(ENV_LOG_DIR, value, normalize_log_dir))
            .transpose()?;
        let echo_to_stderr = match read(ENV_LOG_STDERR) {
            Some(value) => checked(ENV_LOG_STDERR, value, parse_flag)?,
            None => false,
        };

        let logging = LoggingConfig {
            level,
            log_dir,
            echo_to_stderr,
        };

        Ok(Self {
            database_path: read(ENV_DB_PATH).map(PathBuf::from),
            seed_dir: read(ENV_SEED_DIR).map(PathBuf::from),
            logging,
        })
    }
}

fn checked<T>(
    key: &'static str,
    value: String,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    parse(&value).map_err(|reason| ConfigError { key, value, reason })
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected 1|true|yes|on or 0|false|no|off".to_string()),
    }
}
