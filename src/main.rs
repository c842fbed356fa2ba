use anyhow::Result;
use clap::Parser;

use petal::cli::{Cli, Commands};
use petal::config::PetalConfig;
use petal::model::FeatureVector;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = PetalConfig::load(cli.config.as_deref())?;

    // Initialize logging
    petal::logging::init(&config.logging)?;

    match cli.command {
        Commands::Serve {
            model,
            port,
            host,
            no_fallback,
        } => {
            petal::cli::serve(config, model, port, host, no_fallback).await?;
        }
        Commands::Predict {
            model,
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        } => {
            let vector = FeatureVector::new(sepal_length, sepal_width, petal_length, petal_width);
            petal::cli::predict(config, model, vector).await?;
        }
        Commands::Info { model } => {
            petal::cli::info(config, model).await?;
        }
        Commands::Ledger { limit, json } => {
            petal::cli::ledger(config, limit, json).await?;
        }
    }

    Ok(())
}
