use std::env;

use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            level: env::var("SHIRABE_LOG_LEVEL").unwrap_or_else(|_| default_level()),
            json: env_or("SHIRABE_LOG_JSON", false),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}
