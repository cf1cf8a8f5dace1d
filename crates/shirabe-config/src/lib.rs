use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use self::dictionary::DictionaryConfig;
pub use self::logging::LoggingConfig;
pub use self::lookup::LookupConfig;

pub mod dictionary;
pub mod logging;
pub mod lookup;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lookup.max_search_length must be at least 1")]
    InvalidMaxSearchLength,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lookup: LookupConfig,
    pub dictionary: DictionaryConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Defaults, overridden by `SHIRABE_*` environment variables
    pub fn new() -> Self {
        Config {
            lookup: LookupConfig::from_env(),
            dictionary: DictionaryConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }

    /// Load a JSON config; missing fields fall back to their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup.max_search_length == 0 {
            return Err(ConfigError::InvalidMaxSearchLength);
        }
        Ok(())
    }
}

/// Parsed environment variable, `default` when unset or unparsable
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Comma separated list from the environment
pub(crate) fn env_list(key: &str) -> Vec<String> {
    env::var(key)
        .map(|v| split_list(&v))
        .unwrap_or_default()
}

pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
