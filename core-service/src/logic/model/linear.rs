//! Linear Classifier - multinomial logistic regression in pure Rust
//!
//! File layout (`psychiatric_model.json`):
//!
//! ```json
//! {
//!   "coef": [[...30 weights...], ...one row per class...],
//!   "intercept": [b0, b1, b2, b3],
//!   "classes": [0, 1, 2, 3],
//!   "probability": true
//! }
//! ```
//!
//! `classes` and `probability` are optional.

use std::path::Path;

use ndarray::{Array1, Array2};
use serde::Deserialize;

use crate::error::ArtifactLoadError;
use crate::logic::features::FeatureVector;

use super::classifier::{Classifier, InferenceError};

#[derive(Debug, Deserialize)]
struct LinearModelFile {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default)]
    classes: Option<Vec<i64>>,
    #[serde(default = "default_probability")]
    probability: bool,
}

fn default_probability() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct LinearClassifier {
    /// [classes, features]
    coef: Array2<f64>,
    intercept: Array1<f64>,
    classes: Vec<i64>,
    explicit_classes: bool,
    probability: bool,
}

impl LinearClassifier {
    pub fn new(
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
        classes: Option<Vec<i64>>,
        probability: bool,
    ) -> Result<Self, String> {
        let rows = coef.len();
        if rows < 2 {
            return Err(format!("need at least 2 coefficient rows, got {}", rows));
        }
        let cols = coef[0].len();
        if coef.iter().any(|row| row.len() != cols) {
            return Err("coefficient rows have different lengths".to_string());
        }
        if intercept.len() != rows {
            return Err(format!(
                "intercept has {} entries for {} classes",
                intercept.len(),
                rows
            ));
        }

        let explicit_classes = classes.is_some();
        let classes = classes.unwrap_or_else(|| (0..rows as i64).collect());
        if classes.len() != rows {
            return Err(format!("classes has {} entries for {} rows", classes.len(), rows));
        }

        let flat: Vec<f64> = coef.into_iter().flatten().collect();
        let coef = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| format!("coefficient shape: {}", e))?;

        Ok(Self {
            coef,
            intercept: Array1::from(intercept),
            classes,
            explicit_classes,
            probability,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ArtifactLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: LinearModelFile =
            serde_json::from_str(&content).map_err(|source| ArtifactLoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::new(file.coef, file.intercept, file.classes, file.probability).map_err(|reason| {
            ArtifactLoadError::Incompatible {
                path: path.to_path_buf(),
                reason,
            }
        })
    }

    /// Label the output columns with `order`.
    ///
    /// A model file that already lists its classes must agree with `order`.
    pub fn with_class_order(mut self, order: &[i64]) -> Result<Self, String> {
        if order.len() != self.classes.len() {
            return Err(format!(
                "class order has {} entries for {} rows",
                order.len(),
                self.classes.len()
            ));
        }
        if self.explicit_classes && self.classes != order {
            return Err(format!(
                "class order {:?} conflicts with model classes {:?}",
                order, self.classes
            ));
        }
        self.classes = order.to_vec();
        self.explicit_classes = true;
        Ok(self)
    }

    pub fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn decision(&self, features: &FeatureVector) -> Result<Array1<f64>, InferenceError> {
        if features.len() != self.n_features() {
            return Err(InferenceError(format!(
                "expected {} features, got {}",
                self.n_features(),
                features.len()
            )));
        }
        let x = Array1::from(features.values.clone());
        Ok(self.coef.dot(&x) + &self.intercept)
    }
}

/// Index of the largest score; ties resolve to the first
fn argmax(scores: &Array1<f64>) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

fn softmax(scores: &Array1<f64>) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / total).collect()
}

impl Classifier for LinearClassifier {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
        let scores = self.decision(features)?;
        Ok(self.classes[argmax(&scores)])
    }

    fn supports_probabilities(&self) -> bool {
        self.probability
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        if !self.probability {
            return Err(InferenceError("probability output disabled".to_string()));
        }
        Ok(softmax(&self.decision(features)?))
    }

    fn expected_features(&self) -> Option<usize> {
        Some(self.n_features())
    }

    fn classes(&self) -> Option<&[i64]> {
        self.explicit_classes.then_some(self.classes.as_slice())
    }

    fn infer(&self, features: &FeatureVector) -> Result<(i64, Option<Vec<f64>>), InferenceError> {
        let scores = self.decision(features)?;
        let class_id = self.classes[argmax(&scores)];
        let probabilities = self.probability.then(|| softmax(&scores));
        Ok((class_id, probabilities))
    }
}
