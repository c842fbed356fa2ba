//! Feature vector and vectorization

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical column order used when a model declares no feature names
pub const FEATURE_ORDER: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// Iris flower measurements in centimetres
///
/// Every field is required on the wire; a missing field fails
/// deserialization instead of falling back to a default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl FeatureVector {
    pub fn new(sepal_length: f64, sepal_width: f64, petal_length: f64, petal_width: f64) -> Self {
        Self {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        }
    }

    /// Look up a value by column name
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "sepal_length" => Some(self.sepal_length),
            "sepal_width" => Some(self.sepal_width),
            "petal_length" => Some(self.petal_length),
            "petal_width" => Some(self.petal_width),
            _ => None,
        }
    }

    /// Values in canonical column order
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }

    /// Check that every field is finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, value) in FEATURE_ORDER.iter().zip(self.as_array()) {
            if !value.is_finite() {
                return Err(Error::Validation(format!("{} must be a finite number", name)));
            }
            if value < 0.0 {
                return Err(Error::Validation(format!(
                    "{} must be >= 0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Convert to positional model input
    ///
    /// When the model declares its own feature names the row follows that
    /// order; otherwise [`FEATURE_ORDER`] is used.
    pub fn to_row(&self, expected: Option<&[String]>) -> Result<Vec<f64>> {
        match expected {
            None => Ok(self.as_array().to_vec()),
            Some(names) => names
                .iter()
                .map(|name| {
                    self.get(name).ok_or_else(|| {
                        Error::Prediction(format!("model expects unknown feature '{}'", name))
                    })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vector_is_valid() {
        assert!(FeatureVector::new(0.0, 0.0, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_negative_field_rejected() {
        let err = FeatureVector::new(5.1, -0.1, 1.4, 0.2).validate().unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("sepal_width")));
    }

    #[test]
    fn test_non_finite_field_rejected() {
        let v = FeatureVector::new(5.1, 3.5, f64::NAN, 0.2);
        assert!(matches!(v.validate(), Err(Error::Validation(_))));
        let v = FeatureVector::new(f64::INFINITY, 3.5, 1.4, 0.2);
        assert!(matches!(v.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_missing_field_fails_deserialization() {
        let json = r#"{"sepal_length":5.1,"sepal_width":3.5,"petal_length":1.4}"#;
        assert!(serde_json::from_str::<FeatureVector>(json).is_err());
    }

    #[test]
    fn test_canonical_row() {
        let v = FeatureVector::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.to_row(None).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_row_follows_model_feature_names() {
        let v = FeatureVector::new(1.0, 2.0, 3.0, 4.0);
        let names: Vec<String> = ["petal_width", "petal_length", "sepal_width", "sepal_length"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(v.to_row(Some(&names)).unwrap(), vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_unknown_feature_name_is_prediction_error() {
        let v = FeatureVector::new(1.0, 2.0, 3.0, 4.0);
        let names = vec!["sepal_area".to_string()];
        assert!(matches!(v.to_row(Some(&names)), Err(Error::Prediction(_))));
    }
}
