//! Application configuration

use std::path::PathBuf;
use thiserror::Error;

/// Default on-disk location of the key-value store
pub const DEFAULT_STORAGE_PATH: &str = "jw_companion_kv.db";

/// Default log filter, used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable overriding [`AppConfig::storage_path`]
pub const ENV_STORAGE_PATH: &str = "JW_COMPANION_STORAGE_PATH";

/// Environment variable overriding [`AppConfig::log_filter`]
pub const ENV_LOG: &str = "JW_COMPANION_LOG";

/// Environment variable overriding [`AppConfig::in_memory_storage`]
pub const ENV_IN_MEMORY_STORAGE: &str = "JW_COMPANION_IN_MEMORY_STORAGE";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable held a value that could not be parsed
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name
        var: String,
        /// Offending value
        value: String,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Key-value store location
    pub storage_path: PathBuf,
    /// Default `tracing` filter directive
    pub log_filter: String,
    /// Storage key of the theme preference
    pub theme_key: String,
    /// Use a temporary store that is discarded on exit
    pub in_memory_storage: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            theme_key: app_ui::theme::THEME_MODE_KEY.to_string(),
            in_memory_storage: false,
        }
    }
}

impl AppConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage path
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Set the default log filter
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Set the theme preference key
    pub fn with_theme_key(mut self, key: impl Into<String>) -> Self {
        self.theme_key = key.into();
        self
    }

    /// Use a temporary in-memory store
    pub fn in_memory(mut self) -> Self {
        self.in_memory_storage = true;
        self
    }

    /// Build from process environment variables
    ///
    /// Optional:
    /// - `JW_COMPANION_STORAGE_PATH`: default `jw_companion_kv.db`
    /// - `JW_COMPANION_LOG`: default `info`
    /// - `JW_COMPANION_IN_MEMORY_STORAGE`: `1`/`true` or `0`/`false`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_STORAGE_PATH).filter(|v| !v.trim().is_empty()) {
            config.storage_path = PathBuf::from(path);
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }
        if let Some(raw) = lookup(ENV_IN_MEMORY_STORAGE) {
            config.in_memory_storage = parse_bool(ENV_IN_MEMORY_STORAGE, &raw)?;
        }

        Ok(config)
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue { var: var.to_string(), value: raw.to_string() }),
    }
}
