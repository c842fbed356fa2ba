//! One-shot prediction command

use std::path::PathBuf;

use anyhow::Result;

use crate::config::PetalConfig;
use crate::engine::Pipeline;
use crate::model::FeatureVector;

/// Classify one vector through the full pipeline and print the result
pub async fn predict(
    mut config: PetalConfig,
    model: Option<PathBuf>,
    vector: FeatureVector,
) -> Result<()> {
    if let Some(model) = model {
        config.model.path = model;
    }

    let pipeline = Pipeline::from_config(&config).await?;
    let result = pipeline.handle_predict(&vector).await;
    pipeline.ledger().close().await;

    let result = result?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
