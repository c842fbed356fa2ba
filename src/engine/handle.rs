//! Model handle for lifecycle management
//!
//! Owns the configured artifact location and, once bound, the loaded model.
//! Binding happens at most once; a handle never goes back to unbound.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::loader;
use crate::model::{class_name, fit_reference_model, FeatureVector, ModelArtifact};

/// Where the bound model came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Loaded from the configured artifact
    Artifact,
    /// Fitted on the embedded reference dataset because no artifact existed
    Fallback,
}

/// Outcome of a single prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_id: i64,
    pub class_name: String,
    /// Probability per class name, when the model supports it
    pub probabilities: Option<BTreeMap<String, f64>>,
}

/// A classifier ready for inference
///
/// Read-only after construction, so it is shared by all concurrent
/// predictions without locking.
#[derive(Debug)]
pub struct LoadedModel {
    artifact: ModelArtifact,
    /// Resolved once at bind time
    supports_proba: bool,
    provenance: Provenance,
}

impl LoadedModel {
    fn new(artifact: ModelArtifact, provenance: Provenance) -> Self {
        Self {
            supports_proba: artifact.model.supports_proba(),
            artifact,
            provenance,
        }
    }

    /// Load a model from an artifact on disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ArtifactNotFound(path.to_path_buf()));
        }
        let artifact = loader::load_artifact(path)?;
        Ok(Self::new(artifact, Provenance::Artifact))
    }

    /// Fit the fallback model on the embedded reference dataset
    pub fn fallback() -> Self {
        Self::new(fit_reference_model(), Provenance::Fallback)
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn supports_proba(&self) -> bool {
        self.supports_proba
    }

    /// Classify one feature vector
    pub fn predict(&self, vector: &FeatureVector) -> Result<Prediction> {
        let row = vector.to_row(self.artifact.feature_names.as_deref())?;
        let classes = &self.artifact.classes;

        let index = self.artifact.model.predict(&row)?;
        let class_id = classes[index];

        let probabilities = if self.supports_proba {
            self.artifact.model.predict_proba(&row)?.map(|proba| {
                classes
                    .iter()
                    .zip(proba)
                    .map(|(id, p)| (class_name(*id), p))
                    .collect()
            })
        } else {
            None
        };

        Ok(Prediction {
            class_id,
            class_name: class_name(class_id),
            probabilities,
        })
    }
}

/// Handle owning the model lifecycle
pub struct ModelHandle {
    /// Artifact location, fixed at configuration time
    path: PathBuf,
    /// Synthesize the reference model when no artifact exists
    allow_fallback: bool,
    model: OnceLock<LoadedModel>,
}

impl ModelHandle {
    /// Create an unbound handle
    pub fn new(path: impl Into<PathBuf>, allow_fallback: bool) -> Self {
        Self {
            path: path.into(),
            allow_fallback,
            model: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bind a model if none is bound yet
    ///
    /// Load failures are logged and leave the handle unbound; callers check
    /// [`is_ready`](Self::is_ready). Every call on an unbound handle retries.
    pub fn ensure_loaded(&self) {
        if self.is_ready() {
            return;
        }

        let loaded = match LoadedModel::load(&self.path) {
            Ok(model) => model,
            Err(Error::ArtifactNotFound(path)) if self.allow_fallback => {
                tracing::warn!(
                    "No model artifact at {}; serving fallback reference model (unverified provenance)",
                    path.display()
                );
                LoadedModel::fallback()
            }
            Err(e) => {
                tracing::error!("Failed to load model: {}", e);
                return;
            }
        };

        self.bind(loaded);
    }

    /// Compare-and-set bind; a model bound by a concurrent load is kept
    fn bind(&self, loaded: LoadedModel) {
        let kind = loaded.artifact.model.kind();
        let provenance = loaded.provenance;
        match self.model.set(loaded) {
            Ok(()) => {
                tracing::info!(
                    "Loaded {} model from {} ({:?})",
                    kind,
                    self.path.display(),
                    provenance
                );
            }
            Err(_) => {
                tracing::debug!("Model already bound by a concurrent load; discarding ours");
            }
        }
    }

    /// Whether a usable model is bound
    pub fn is_ready(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn provenance(&self) -> Option<Provenance> {
        self.model.get().map(LoadedModel::provenance)
    }

    /// The bound model, if any
    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.get()
    }

    /// Classify with the bound model
    pub fn predict(&self, vector: &FeatureVector) -> Result<Prediction> {
        self.model
            .get()
            .ok_or(Error::ModelUnavailable)?
            .predict(vector)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::loader::save_artifact;
    use crate::model::Classifier;

    fn centroid_artifact() -> ModelArtifact {
        ModelArtifact::new(Classifier::NearestCentroid {
            centroids: vec![
                vec![5.0, 3.4, 1.5, 0.2],
                vec![5.9, 2.8, 4.3, 1.3],
                vec![6.6, 3.0, 5.6, 2.0],
            ],
        })
    }

    #[test]
    fn test_unbound_until_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_artifact(&centroid_artifact(), &path).unwrap();

        let handle = ModelHandle::new(&path, false);
        assert!(!handle.is_ready());
        assert!(matches!(
            handle.predict(&FeatureVector::new(5.1, 3.5, 1.4, 0.2)),
            Err(Error::ModelUnavailable)
        ));

        handle.ensure_loaded();
        assert!(handle.is_ready());
        assert_eq!(handle.provenance(), Some(Provenance::Artifact));
    }

    #[test]
    fn test_missing_artifact_without_fallback_stays_unready() {
        let dir = tempfile::tempdir().unwrap();
        let handle = ModelHandle::new(dir.path().join("absent.json"), false);
        handle.ensure_loaded();
        handle.ensure_loaded();
        assert!(!handle.is_ready());
        assert_eq!(handle.provenance(), None);
    }

    #[test]
    fn test_missing_artifact_with_fallback_is_ready_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let handle = ModelHandle::new(dir.path().join("absent.json"), true);
        handle.ensure_loaded();
        assert!(handle.is_ready());
        assert_eq!(handle.provenance(), Some(Provenance::Fallback));

        let prediction = handle.predict(&FeatureVector::new(5.1, 3.5, 1.4, 0.2)).unwrap();
        assert_eq!(prediction.class_id, 0);
        assert_eq!(prediction.class_name, "setosa");
        let proba = prediction.probabilities.unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.values().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_artifact_does_not_trigger_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "garbage").unwrap();
        let handle = ModelHandle::new(&path, true);
        handle.ensure_loaded();
        assert!(!handle.is_ready());
    }

    #[test]
    fn test_unready_handle_heals_when_artifact_appears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let handle = ModelHandle::new(&path, false);
        handle.ensure_loaded();
        assert!(!handle.is_ready());

        save_artifact(&centroid_artifact(), &path).unwrap();
        handle.ensure_loaded();
        assert!(handle.is_ready());
    }

    #[test]
    fn test_bound_model_survives_artifact_removal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_artifact(&centroid_artifact(), &path).unwrap();
        let handle = ModelHandle::new(&path, false);
        handle.ensure_loaded();

        std::fs::remove_file(&path).unwrap();
        handle.ensure_loaded();
        assert!(handle.is_ready());
        assert!(handle.predict(&FeatureVector::new(5.1, 3.5, 1.4, 0.2)).is_ok());
    }

    #[test]
    fn test_probabilities_absent_without_capability() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_artifact(&centroid_artifact(), &path).unwrap();
        let handle = ModelHandle::new(&path, false);
        handle.ensure_loaded();

        let model = handle.model().unwrap();
        assert!(!model.supports_proba());
        let prediction = handle.predict(&FeatureVector::new(6.7, 3.1, 5.8, 2.2)).unwrap();
        assert_eq!(prediction.class_id, 2);
        assert!(prediction.probabilities.is_none());
    }

    #[test]
    fn test_unrecognized_class_id_uses_numeric_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut artifact = centroid_artifact();
        artifact.classes = vec![0, 1, 9];
        save_artifact(&artifact, &path).unwrap();
        let handle = ModelHandle::new(&path, false);
        handle.ensure_loaded();

        let prediction = handle.predict(&FeatureVector::new(6.7, 3.1, 5.8, 2.2)).unwrap();
        assert_eq!(prediction.class_id, 9);
        assert_eq!(prediction.class_name, "9");
    }

    #[test]
    fn test_concurrent_first_loads_bind_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_artifact(&centroid_artifact(), &path).unwrap();
        let handle = Arc::new(ModelHandle::new(&path, false));

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let handle = Arc::clone(&handle);
                std::thread::spawn(move || handle.ensure_loaded())
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert!(handle.is_ready());
        assert_eq!(handle.model().unwrap().artifact(), &centroid_artifact());
    }
}
