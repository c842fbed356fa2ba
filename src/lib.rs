//! Petal - inference gateway for a pretrained iris classifier
//!
//! Petal accepts flower measurements, answers with a class prediction and an
//! optional probability distribution, and records every attempt for
//! observability and audit.
//!
//! # Architecture
//!
//! - **model**: feature vector, classifier families, embedded reference model
//! - **loader**: JSON/YAML artifact detection and parsing
//! - **engine**: model handle lifecycle, serving pipeline, readiness probe
//! - **metrics** / **ledger**: Prometheus counters and the SQLite audit log
//! - **server** / **cli**: HTTP and command-line surfaces
//!
//! # Example
//!
//! ```bash
//! # Start server
//! petal serve --model artifacts/model/model.json --port 8000
//!
//! # One-shot prediction
//! petal predict --sepal-length 5.1 --sepal-width 3.5 --petal-length 1.4 --petal-width 0.2
//!
//! # Inspect the audit ledger
//! petal ledger -n 10
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod server;

// Re-export key types
pub use config::{PetalConfig, ServerConfig};
pub use engine::{ModelHandle, Pipeline, PredictionResult, ReadinessReport};
pub use error::{Error, Result};
pub use ledger::{Ledger, PredictionRecord};
pub use metrics::Metrics;
pub use model::FeatureVector;
