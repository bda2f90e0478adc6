//! Classifier seam
//!
//! The pipeline only needs two capabilities from a trained model: a
//! deterministic class prediction and, optionally, a calibrated probability
//! vector. Runtimes (ONNX, the pure-Rust linear model, test stubs) plug in
//! behind this trait.

use std::path::Path;

use thiserror::Error;

use crate::logic::features::FeatureVector;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
#[error("InferenceError: {0}")]
pub struct InferenceError(pub String);

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

pub trait Classifier: Send + Sync {
    /// Short runtime name for metadata and logs
    fn kind(&self) -> &'static str;

    /// Predicted class id
    fn predict(&self, features: &FeatureVector) -> Result<i64, InferenceError>;

    /// Whether `predict_proba` is available
    fn supports_probabilities(&self) -> bool {
        false
    }

    /// One probability per class, in the model's own class order
    fn predict_proba(&self, _features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        Err(InferenceError(format!(
            "{} classifier has no probability output",
            self.kind()
        )))
    }

    /// Number of input features, when the runtime can tell before running
    fn expected_features(&self) -> Option<usize> {
        None
    }

    /// Class id of each probability column, when the model reports it
    fn classes(&self) -> Option<&[i64]> {
        None
    }

    /// Class and (if supported) probabilities in one call.
    ///
    /// Runtimes that produce both from a single pass should override this.
    fn infer(&self, features: &FeatureVector) -> Result<(i64, Option<Vec<f64>>), InferenceError> {
        let class_id = self.predict(features)?;
        let probabilities = if self.supports_probabilities() {
            Some(self.predict_proba(features)?)
        } else {
            None
        };
        Ok((class_id, probabilities))
    }
}

// ============================================================================
// ON-DISK FORMATS
// ============================================================================

/// Serialized classifier formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierFormat {
    /// ONNX graph exported from the training pipeline
    Onnx,
    /// JSON multinomial linear model
    Linear,
}

impl ClassifierFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("onnx") {
            Some(ClassifierFormat::Onnx)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(ClassifierFormat::Linear)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierFormat::Onnx => "onnx",
            ClassifierFormat::Linear => "linear",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ClassifierFormat::from_path(Path::new("models/m.onnx")),
            Some(ClassifierFormat::Onnx)
        );
        assert_eq!(
            ClassifierFormat::from_path(Path::new("m.JSON")),
            Some(ClassifierFormat::Linear)
        );
        assert_eq!(ClassifierFormat::from_path(Path::new("m.joblib")), None);
        assert_eq!(ClassifierFormat::from_path(Path::new("model")), None);
    }
}
