//! Logging and ledger configuration settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for `app.log`
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    /// Default verbosity when `RUST_LOG` is unset (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,

    /// Rotate `app.log` once it reaches this many bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,

    /// Rotated files kept as `app.log.1` .. `app.log.N`
    #[serde(default = "default_backups")]
    pub backups: usize,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_level() -> String {
    "info".to_string()
}

fn default_max_file_bytes() -> usize {
    5_000_000
}

fn default_backups() -> usize {
    3
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            level: default_level(),
            max_file_bytes: default_max_file_bytes(),
            backups: default_backups(),
        }
    }
}

/// Prediction ledger configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// SQLite database file (default: `<log dir>/predictions.db`)
    #[serde(default)]
    pub path: Option<PathBuf>,
}
