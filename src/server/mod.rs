//! HTTP server for inference
//!
//! Exposes readiness, prediction and Prometheus endpoints.

mod handlers;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::engine::Pipeline;

pub use handlers::AppState;
pub use routes::api_routes;

/// Build the application router
pub fn app(pipeline: Arc<Pipeline>, config: &ServerConfig) -> Router {
    let state = Arc::new(AppState::new(pipeline));

    let mut app = Router::new()
        .merge(api_routes())
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .with_state(state);

    if config.permissive_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }
    if config.trace_requests {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

/// Start the HTTP inference server
pub async fn start(pipeline: Arc<Pipeline>, config: ServerConfig) -> Result<()> {
    let app = app(Arc::clone(&pipeline), &config);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health  - Readiness check");
    tracing::info!("  POST /predict - Classify a feature vector");
    tracing::info!("  GET  /metrics - Prometheus metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pipeline.ledger().close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
