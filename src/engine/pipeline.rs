//! Prediction pipeline
//!
//! Validates input, makes sure a model is bound, runs inference and records
//! every attempt in metrics, the ledger and the log stream.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::PetalConfig;
use crate::engine::{ModelHandle, Prediction, ReadinessReport};
use crate::error::{Error, Result};
use crate::ledger::{Ledger, PredictionRecord, NO_PREDICTION};
use crate::metrics::Metrics;
use crate::model::FeatureVector;

/// Response for a successful prediction
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub label_id: i64,
    pub label_name: String,
    pub probabilities: Option<BTreeMap<String, f64>>,
    pub model_path: String,
    pub timestamp: String,
}

/// Current UTC time as ISO-8601
pub(crate) fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Serving pipeline
///
/// Shared by all in-flight requests behind an `Arc`.
pub struct Pipeline {
    model: Arc<ModelHandle>,
    metrics: Arc<Metrics>,
    ledger: Ledger,
}

impl Pipeline {
    pub fn new(model: Arc<ModelHandle>, metrics: Arc<Metrics>, ledger: Ledger) -> Self {
        Self {
            model,
            metrics,
            ledger,
        }
    }

    /// Build a pipeline from configuration
    ///
    /// Opens the ledger (creating its schema) and registers metrics. The model
    /// handle starts unbound.
    pub async fn from_config(config: &PetalConfig) -> Result<Self> {
        let model = Arc::new(ModelHandle::new(
            &config.model.path,
            config.model.allow_fallback,
        ));
        let metrics = Arc::new(Metrics::new()?);
        let ledger = Ledger::open(config.ledger_path()).await?;
        Ok(Self::new(model, metrics, ledger))
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    fn model_path(&self) -> &Path {
        self.model.path()
    }

    /// Readiness of the bound model; never triggers a load
    pub fn status(&self) -> ReadinessReport {
        ReadinessReport::of(&self.model)
    }

    /// Bind the model off the async workers; returns readiness afterwards
    pub async fn ensure_loaded(&self) -> bool {
        if self.model.is_ready() {
            return true;
        }
        let model = Arc::clone(&self.model);
        if let Err(e) = tokio::task::spawn_blocking(move || model.ensure_loaded()).await {
            tracing::error!("Model load task failed: {}", e);
        }
        self.model.is_ready()
    }

    /// Classify one feature vector
    pub async fn handle_predict(&self, vector: &FeatureVector) -> Result<PredictionResult> {
        vector.validate()?;

        if !self.ensure_loaded().await {
            return Err(Error::ModelUnavailable);
        }

        let start = Instant::now();
        let timestamp = utc_timestamp();
        self.metrics.record_request();

        let outcome = self.model.predict(vector);

        let elapsed = start.elapsed();
        let latency_ms = elapsed.as_secs_f64() * 1000.0;
        self.metrics.record_latency(elapsed.as_secs_f64());
        self.audit(vector, &outcome, &timestamp, latency_ms).await;

        let prediction = outcome?;
        Ok(PredictionResult {
            label_id: prediction.class_id,
            label_name: prediction.class_name,
            probabilities: prediction.probabilities,
            model_path: self.model_path().display().to_string(),
            timestamp,
        })
    }

    /// Ledger append and structured log line; never fails
    async fn audit(
        &self,
        vector: &FeatureVector,
        outcome: &Result<Prediction>,
        timestamp: &str,
        latency_ms: f64,
    ) {
        let prediction = outcome
            .as_ref()
            .map(|p| p.class_id)
            .unwrap_or(NO_PREDICTION);

        let record = PredictionRecord {
            ts: timestamp.to_string(),
            features: *vector,
            prediction,
            latency_ms,
        };
        if let Err(e) = self.ledger.append(&record).await {
            tracing::warn!("Failed to log prediction to ledger: {}", e);
        }

        match outcome {
            Ok(_) => tracing::info!(
                sepal_length = vector.sepal_length,
                sepal_width = vector.sepal_width,
                petal_length = vector.petal_length,
                petal_width = vector.petal_width,
                label_id = prediction,
                latency_ms,
                "pred"
            ),
            Err(e) => tracing::warn!(
                sepal_length = vector.sepal_length,
                sepal_width = vector.sepal_width,
                petal_length = vector.petal_length,
                petal_width = vector.petal_width,
                label_id = prediction,
                latency_ms,
                error = %e,
                "pred failed"
            ),
        }
    }
}
