//! Model info command

use std::path::PathBuf;

use anyhow::Result;

use crate::config::PetalConfig;
use crate::error::Error;
use crate::loader::{self, detect_artifact_source};
use crate::model::{class_name, ModelArtifact, FEATURE_ORDER};

/// Show model information
pub async fn info(config: PetalConfig, model: Option<PathBuf>) -> Result<()> {
    let path = model.unwrap_or_else(|| config.model.path.clone());

    println!("Model: {}\n", path.display());

    let source = match detect_artifact_source(&path) {
        Ok(source) => source,
        Err(Error::ArtifactNotFound(_)) => {
            println!("No artifact found.");
            if config.model.allow_fallback {
                println!("The server would fit and serve the embedded reference model (gaussian_nb).");
            } else {
                println!("Fallback is disabled; the server would report not ready.");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Path: {}", source.path.display());
    println!("Format: {}\n", source.format.name());

    let artifact = loader::load_artifact(&source.path)?;
    print_artifact_info(&artifact);

    if let Ok(metadata) = std::fs::metadata(&source.path) {
        let size_kb = metadata.len() as f64 / 1024.0;
        println!("\nFile size: {:.2} KB", size_kb);
    }

    Ok(())
}

fn print_artifact_info(artifact: &ModelArtifact) {
    println!("Configuration:");
    println!("  Classifier: {}", artifact.model.kind());
    println!(
        "  Probabilities: {}",
        if artifact.model.supports_proba() {
            "yes"
        } else {
            "no"
        }
    );

    let classes: Vec<String> = artifact
        .classes
        .iter()
        .map(|id| format!("{}={}", id, class_name(*id)))
        .collect();
    println!("  Classes: {}", classes.join(", "));

    match &artifact.feature_names {
        Some(names) => println!("  Features: {}", names.join(", ")),
        None => println!("  Features: {} (canonical order)", FEATURE_ORDER.join(", ")),
    }
}
