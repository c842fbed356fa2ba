//! Classifier artifacts and inference math
//!
//! An artifact is a serialized [`ModelArtifact`]: the fitted parameters of one
//! of the supported [`Classifier`] families, the class ids they predict, and
//! optionally the feature names the model was fitted on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::features::FEATURE_ORDER;

/// Fitted classifier parameters
///
/// Matrices are indexed `[class][feature]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Multinomial logistic regression (softmax over linear scores)
    LogisticRegression {
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    /// Gaussian naive Bayes
    GaussianNb {
        theta: Vec<Vec<f64>>,
        var: Vec<Vec<f64>>,
        priors: Vec<f64>,
    },
    /// Nearest class centroid (squared Euclidean distance)
    NearestCentroid { centroids: Vec<Vec<f64>> },
}

impl Classifier {
    /// Short name of the classifier family
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::LogisticRegression { .. } => "logistic_regression",
            Classifier::GaussianNb { .. } => "gaussian_nb",
            Classifier::NearestCentroid { .. } => "nearest_centroid",
        }
    }

    /// Whether this family can produce class probabilities
    pub fn supports_proba(&self) -> bool {
        !matches!(self, Classifier::NearestCentroid { .. })
    }

    fn rows(&self) -> &[Vec<f64>] {
        match self {
            Classifier::LogisticRegression { coef, .. } => coef,
            Classifier::GaussianNb { theta, .. } => theta,
            Classifier::NearestCentroid { centroids } => centroids,
        }
    }

    /// Number of classes the parameters describe
    pub fn n_classes(&self) -> usize {
        self.rows().len()
    }

    /// Number of input features the parameters expect
    pub fn n_features(&self) -> usize {
        self.rows().first().map(Vec::len).unwrap_or(0)
    }

    /// Check internal shape consistency
    fn check_shape(&self) -> std::result::Result<(), String> {
        let n_classes = self.n_classes();
        let n_features = self.n_features();
        if n_classes == 0 || n_features == 0 {
            return Err("classifier has no parameters".to_string());
        }
        let ragged = |m: &[Vec<f64>]| is_ragged(m, n_classes, n_features);

        match self {
            Classifier::LogisticRegression { coef, intercept } => {
                if ragged(coef.as_slice()) {
                    return Err("coef rows have inconsistent lengths".to_string());
                }
                if intercept.len() != n_classes {
                    return Err(format!(
                        "intercept has {} entries, expected {}",
                        intercept.len(),
                        n_classes
                    ));
                }
            }
            Classifier::GaussianNb { theta, var, priors } => {
                if ragged(theta.as_slice()) || ragged(var.as_slice()) {
                    return Err("theta/var shapes do not match".to_string());
                }
                if var.iter().flatten().any(|v| *v <= 0.0 || !v.is_finite()) {
                    return Err("variances must be positive".to_string());
                }
                if priors.len() != n_classes || priors.iter().any(|p| *p <= 0.0) {
                    return Err("priors must be positive, one per class".to_string());
                }
            }
            Classifier::NearestCentroid { centroids } => {
                if ragged(centroids.as_slice()) {
                    return Err("centroid rows have inconsistent lengths".to_string());
                }
            }
        }
        Ok(())
    }

    /// Per-class scores; larger is more likely
    fn decision_function(&self, row: &[f64]) -> Vec<f64> {
        match self {
            Classifier::LogisticRegression { coef, intercept } => coef
                .iter()
                .zip(intercept)
                .map(|(w, b)| w.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + b)
                .collect(),
            Classifier::GaussianNb { theta, var, priors } => theta
                .iter()
                .zip(var)
                .zip(priors)
                .map(|((mu, var), prior)| {
                    let log_likelihood: f64 = mu
                        .iter()
                        .zip(var)
                        .zip(row)
                        .map(|((m, v), x)| {
                            -0.5 * (2.0 * std::f64::consts::PI * v).ln() - (x - m).powi(2) / (2.0 * v)
                        })
                        .sum();
                    prior.ln() + log_likelihood
                })
                .collect(),
            Classifier::NearestCentroid { centroids } => centroids
                .iter()
                .map(|c| -c.iter().zip(row).map(|(c, x)| (x - c).powi(2)).sum::<f64>())
                .collect(),
        }
    }

    fn check_row(&self, row: &[f64]) -> Result<()> {
        if row.len() != self.n_features() {
            return Err(Error::Prediction(format!(
                "expected {} features, got {}",
                self.n_features(),
                row.len()
            )));
        }
        if row.iter().any(|x| !x.is_finite()) {
            return Err(Error::Prediction("input contains non-finite values".to_string()));
        }
        Ok(())
    }

    /// Decision scores for a checked row; every score must be finite
    fn scores(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_row(row)?;
        let scores = self.decision_function(row);
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(Error::Prediction(
                "classifier produced non-finite scores".to_string(),
            ));
        }
        Ok(scores)
    }

    /// Index of the predicted class
    ///
    /// Ties resolve to the lowest index.
    pub fn predict(&self, row: &[f64]) -> Result<usize> {
        let scores = self.scores(row)?;
        let mut best = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }
        Ok(best)
    }

    /// Normalized class probabilities, `None` for families without them
    pub fn predict_proba(&self, row: &[f64]) -> Result<Option<Vec<f64>>> {
        if !self.supports_proba() {
            return Ok(None);
        }
        Ok(Some(softmax(&self.scores(row)?)))
    }
}

fn is_ragged(m: &[Vec<f64>], rows: usize, cols: usize) -> bool {
    m.len() != rows || m.iter().any(|r| r.len() != cols)
}

/// Numerically stable softmax
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn default_classes() -> Vec<i64> {
    vec![0, 1, 2]
}

/// A serialized model: parameters plus the metadata needed to use them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Feature names in the order the model was fitted on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,

    /// Class id for each parameter row
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,

    /// Fitted parameters
    pub model: Classifier,
}

impl ModelArtifact {
    pub fn new(model: Classifier) -> Self {
        Self {
            feature_names: None,
            classes: default_classes(),
            model,
        }
    }

    /// Declare the fitted feature order
    pub fn with_feature_names(mut self, names: &[&str]) -> Self {
        self.feature_names = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Check that classes, feature names and parameters agree
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.model.check_shape()?;
        let mut seen = BTreeSet::new();
        if let Some(dup) = self.classes.iter().find(|id| !seen.insert(**id)) {
            return Err(format!("duplicate class id {}", dup));
        }
        if self.classes.len() != self.model.n_classes() {
            return Err(format!(
                "{} classes declared but parameters describe {}",
                self.classes.len(),
                self.model.n_classes()
            ));
        }
        let expected = self
            .feature_names
            .as_ref()
            .map(Vec::len)
            .unwrap_or(FEATURE_ORDER.len());
        if self.model.n_features() != expected {
            return Err(format!(
                "parameters expect {} features, artifact declares {}",
                self.model.n_features(),
                expected
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid_model() -> Classifier {
        Classifier::NearestCentroid {
            centroids: vec![
                vec![5.0, 3.4, 1.5, 0.2],
                vec![5.9, 2.8, 4.3, 1.3],
                vec![6.6, 3.0, 5.6, 2.0],
            ],
        }
    }

    #[test]
    fn test_nearest_centroid_predicts_closest() {
        let model = centroid_model();
        assert_eq!(model.predict(&[5.1, 3.5, 1.4, 0.2]).unwrap(), 0);
        assert_eq!(model.predict(&[6.7, 3.1, 5.8, 2.2]).unwrap(), 2);
        assert!(model.predict_proba(&[5.1, 3.5, 1.4, 0.2]).unwrap().is_none());
    }

    #[test]
    fn test_logistic_regression_proba_sums_to_one() {
        let model = Classifier::LogisticRegression {
            coef: vec![vec![0.0, 0.0, -2.0, -1.0], vec![0.0, 0.0, 0.5, 0.0], vec![0.0, 0.0, 1.5, 1.0]],
            intercept: vec![6.0, 0.0, -6.0],
        };
        let proba = model.predict_proba(&[5.1, 3.5, 1.4, 0.2]).unwrap().unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&[5.1, 3.5, 1.4, 0.2]).unwrap(), 0);
    }

    #[test]
    fn test_wrong_row_length_is_prediction_error() {
        let model = centroid_model();
        assert!(matches!(model.predict(&[1.0, 2.0]), Err(Error::Prediction(_))));
    }

    #[test]
    fn test_artifact_shape_mismatch_rejected() {
        let artifact = ModelArtifact {
            feature_names: None,
            classes: vec![0, 1],
            model: centroid_model(),
        };
        assert!(artifact.validate().is_err());

        let artifact = ModelArtifact::new(centroid_model()).with_feature_names(&["a", "b"]);
        assert!(artifact.validate().is_err());

        assert!(ModelArtifact::new(centroid_model()).validate().is_ok());
    }

    #[test]
    fn test_overflowing_input_is_prediction_error() {
        let reference = crate::model::fit_reference_model().model;
        let row = [1e200; 4];
        assert!(matches!(reference.predict(&row), Err(Error::Prediction(_))));
        assert!(matches!(reference.predict_proba(&row), Err(Error::Prediction(_))));
        assert!(matches!(centroid_model().predict(&row), Err(Error::Prediction(_))));
    }

    #[test]
    fn test_duplicate_class_ids_rejected() {
        let artifact = ModelArtifact {
            feature_names: None,
            classes: vec![0, 0, 1],
            model: Classifier::LogisticRegression {
                coef: vec![vec![0.0; 4]; 3],
                intercept: vec![0.0; 3],
            },
        };
        let err = artifact.validate().unwrap_err();
        assert!(err.contains("duplicate class id 0"));
    }

    #[test]
    fn test_artifact_json_tagging() {
        let json = r#"{
            "classes": [0, 1, 2],
            "model": {"kind": "nearest_centroid", "centroids": [[1,1,1,1],[2,2,2,2],[3,3,3,3]]}
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.model.kind(), "nearest_centroid");
        assert!(artifact.feature_names.is_none());
        assert!(artifact.validate().is_ok());
    }
}
