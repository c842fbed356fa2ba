//! HTTP server command

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::PetalConfig;
use crate::engine::Pipeline;
use crate::server;

/// Start the inference server
pub async fn serve(
    mut config: PetalConfig,
    model: Option<PathBuf>,
    port: Option<u16>,
    host: Option<String>,
    no_fallback: bool,
) -> Result<()> {
    if let Some(model) = model {
        config.model.path = model;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }
    if no_fallback {
        config.model.allow_fallback = false;
    }

    let pipeline = Arc::new(Pipeline::from_config(&config).await?);

    // Eager load; failure leaves the handle unbound and requests retry lazily
    tracing::info!("Pre-loading model: {}", config.model.path.display());
    if pipeline.ensure_loaded().await {
        tracing::info!("Model loaded successfully");
    } else {
        tracing::warn!("Model not loaded; /health will report not ready");
    }

    tracing::info!("Starting server at http://{}", config.server.addr());
    server::start(pipeline, config.server).await?;

    Ok(())
}
