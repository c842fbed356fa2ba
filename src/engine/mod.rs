//! Core inference engine
//!
//! This module provides the prediction pipeline:
//! - ModelHandle: Owns the model lifecycle (load, fallback, bind once)
//! - Pipeline: Validation, inference, metrics and ledger auditing
//! - ReadinessReport: Side-effect-free readiness probe

mod handle;
mod pipeline;
mod readiness;

pub use handle::{LoadedModel, ModelHandle, Prediction, Provenance};
pub use pipeline::{Pipeline, PredictionResult};
pub use readiness::ReadinessReport;
