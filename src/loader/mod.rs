//! Model artifact loading
//!
//! Artifacts are serialized [`ModelArtifact`]s in JSON or YAML. The format is
//! detected from the path, the artifact is parsed and its shape checked before
//! it is handed to the model handle.

mod detect;

pub use detect::{detect_artifact_source, ArtifactFormat, ArtifactSource};

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::ModelArtifact;

/// Load and validate an artifact from any supported format
pub fn load_artifact<P: AsRef<Path>>(path: P) -> Result<ModelArtifact> {
    let source = detect_artifact_source(path)?;
    let content = std::fs::read_to_string(&source.path)?;

    let invalid = |reason: String| Error::ArtifactInvalid {
        path: source.path.clone(),
        reason,
    };

    let artifact: ModelArtifact = match source.format {
        ArtifactFormat::Json => serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?,
        ArtifactFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?,
    };
    artifact.validate().map_err(invalid)?;

    tracing::debug!(
        "Parsed {} artifact {} ({})",
        source.format.name(),
        source.path.display(),
        artifact.model.kind()
    );
    Ok(artifact)
}

/// Write an artifact as JSON
pub fn save_artifact<P: AsRef<Path>>(artifact: &ModelArtifact, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(artifact).map_err(|e| Error::ArtifactInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{fit_reference_model, Classifier};

    #[test]
    fn test_json_artifact_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts/model/model.json");
        let artifact = fit_reference_model();
        save_artifact(&artifact, &path).unwrap();
        assert_eq!(load_artifact(&path).unwrap(), artifact);
    }

    #[test]
    fn test_yaml_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.yaml");
        let yaml = r#"
feature_names: [petal_length, petal_width, sepal_length, sepal_width]
classes: [0, 1, 2]
model:
  kind: nearest_centroid
  centroids:
    - [1.5, 0.2, 5.0, 3.4]
    - [4.3, 1.3, 5.9, 2.8]
    - [5.6, 2.0, 6.6, 3.0]
"#;
        std::fs::write(&path, yaml).unwrap();
        let artifact = load_artifact(&path).unwrap();
        assert!(matches!(artifact.model, Classifier::NearestCentroid { .. }));
        assert_eq!(artifact.feature_names.as_ref().map(Vec::len), Some(4));
    }

    #[test]
    fn test_corrupt_artifact_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_artifact(&path), Err(Error::ArtifactInvalid { .. })));
    }

    #[test]
    fn test_duplicate_classes_artifact_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let json = r#"{"classes":[0,0,1],"model":{"kind":"logistic_regression","coef":[[0,0,0,0],[0,0,0,0],[0,0,0,0]],"intercept":[0,0,0]}}"#;
        std::fs::write(&path, json).unwrap();
        assert!(matches!(load_artifact(&path), Err(Error::ArtifactInvalid { .. })));
    }

    #[test]
    fn test_inconsistent_artifact_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let json = r#"{"classes":[0,1,2],"model":{"kind":"logistic_regression","coef":[[1,2,3,4]],"intercept":[0]}}"#;
        std::fs::write(&path, json).unwrap();
        assert!(matches!(load_artifact(&path), Err(Error::ArtifactInvalid { .. })));
    }
}
