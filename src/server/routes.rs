//! Route definitions

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, metrics, predict, AppState};

/// Create the API router
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Readiness check
        .route("/health", get(health))
        .route("/predict", post(predict))
        // Prometheus scrape target
        .route("/metrics", get(metrics))
}
