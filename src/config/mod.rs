//! Configuration system for petal
//!
//! Settings come from an optional YAML/JSON file, then environment variables,
//! then CLI flags, each layer overriding the previous one.

mod logging;
mod model;
mod server;

pub use logging::{LedgerConfig, LoggingConfig};
pub use model::ModelConfig;
pub use server::ServerConfig;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming the model artifact
pub const ENV_MODEL_PATH: &str = "MODEL_PATH";
/// Environment variable naming the log directory
pub const ENV_LOG_DIR: &str = "LOG_DIR";
/// Environment variable naming the default log level
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
/// Environment variable naming the ledger database
pub const ENV_PREDICTIONS_DB: &str = "PREDICTIONS_DB";
/// Environment variable toggling the reference-model fallback
pub const ENV_ALLOW_FALLBACK: &str = "PETAL_ALLOW_FALLBACK";

/// Petal configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PetalConfig {
    /// Model artifact settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Prediction ledger settings
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Server settings (only for `petal serve`)
    #[serde(default)]
    pub server: ServerConfig,
}

impl PetalConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a JSON file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.extension().map(|e| e == "json").unwrap_or(false) => Self::from_json(p)?,
            Some(p) => Self::from_yaml(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_MODEL_PATH) {
            self.model.path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.logging.dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level.to_lowercase();
        }
        if let Some(db) = lookup(ENV_PREDICTIONS_DB) {
            self.ledger.path = Some(PathBuf::from(db));
        }
        if let Some(flag) = lookup(ENV_ALLOW_FALLBACK) {
            self.model.allow_fallback = parse_bool(&flag).ok_or_else(|| {
                Error::Config(format!("{} must be a boolean, got '{}'", ENV_ALLOW_FALLBACK, flag))
            })?;
        }
        Ok(())
    }

    /// Resolved ledger database location
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger
            .path
            .clone()
            .unwrap_or_else(|| self.logging.dir.join("predictions.db"))
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
