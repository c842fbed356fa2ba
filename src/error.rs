//! Error types for the gateway

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum Error {
    /// Input failed feature vector validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configured model artifact does not exist
    #[error("Model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// Model artifact exists but could not be parsed or is inconsistent
    #[error("Invalid model artifact {}: {reason}", path.display())]
    ArtifactInvalid {
        /// Artifact location
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// No model is bound after a load attempt
    #[error("Model not loaded")]
    ModelUnavailable,

    /// The bound model rejected the input during inference
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// Ledger append or query failed
    #[error("Ledger write error: {0}")]
    LedgerWrite(#[from] sqlx::Error),

    /// Metric registration failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the caller should retry later rather than fix its input
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::ModelUnavailable)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
