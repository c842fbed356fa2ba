//! Model configuration settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Model artifact configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the model artifact (JSON or YAML), or a directory holding one
    #[serde(default = "default_model_path")]
    pub path: PathBuf,

    /// Serve the embedded reference model when no artifact exists
    #[serde(default = "default_true")]
    pub allow_fallback: bool,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("artifacts/model/model.json")
}

fn default_true() -> bool {
    true
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            allow_fallback: true,
        }
    }
}
