//! Tracing subscriber setup
//!
//! Logs go to stderr and, without ANSI colours, to `<log dir>/app.log`, which
//! is rotated by size. `RUST_LOG` takes precedence over the configured level.

use std::sync::Mutex;

use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Log file name inside the configured directory
pub const LOG_FILE: &str = "app.log";

/// Default filter directives for a level
fn default_directives(level: &str) -> String {
    format!("petal={level},tower_http={level}")
}

/// Size-rotated `app.log` writer; backups are `app.log.1` (newest) upward
fn rotating_writer(config: &LoggingConfig) -> FileRotate<AppendCount> {
    FileRotate::new(
        config.dir.join(LOG_FILE),
        AppendCount::new(config.backups),
        ContentLimit::Bytes(config.max_file_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    )
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(&config.dir)?;
    let file = rotating_writer(config);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&config.level)))
        .map_err(|e| Error::Config(format!("invalid log level '{}': {}", config.level, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| Error::Config(e.to_string()))?;

    tracing::info!(
        "Logger initialized (level={}, file={}, rotate at {} bytes, keep {})",
        config.level,
        config.dir.join(LOG_FILE).display(),
        config.max_file_bytes,
        config.backups
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(EnvFilter::try_new(default_directives(level)).is_ok());
        }
    }

    #[test]
    fn test_log_file_rotates_and_prunes_backups() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            dir: dir.path().to_path_buf(),
            max_file_bytes: 32,
            backups: 3,
            ..LoggingConfig::default()
        };

        let mut writer = rotating_writer(&config);
        for _ in 0..20 {
            writer.write_all(b"0123456789\n").unwrap();
        }
        writer.flush().unwrap();

        let log = dir.path().join(LOG_FILE);
        assert!(log.exists());
        assert!(std::fs::metadata(&log).unwrap().len() <= 32);
        assert!(dir.path().join("app.log.1").exists());
        assert!(dir.path().join("app.log.3").exists());
        assert!(!dir.path().join("app.log.4").exists());
    }
}
