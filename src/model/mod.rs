//! Iris classification model components.
//!
//! This module contains the feature vector, classifier families and the
//! embedded reference model.

pub mod classifier;
pub mod features;
pub mod reference;

pub use classifier::{Classifier, ModelArtifact};
pub use features::{FeatureVector, FEATURE_ORDER};
pub use reference::fit_reference_model;

/// Human-readable name for a class id
///
/// Ids outside the iris label set map to their decimal representation.
pub fn class_name(id: i64) -> String {
    match id {
        0 => "setosa".to_string(),
        1 => "versicolor".to_string(),
        2 => "virginica".to_string(),
        other => other.to_string(),
    }
}
