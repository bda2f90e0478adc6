//! ONNX Classifier - ONNX Runtime integration
//!
//! Expects a classifier exported with the zipmap stage disabled:
//! output 0 is the int64 label, output 1 (if present) the float
//! probability matrix `[1, n_classes]`.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use crate::error::ArtifactLoadError;
use crate::logic::features::FeatureVector;

use super::classifier::{Classifier, InferenceError};

pub struct OnnxClassifier {
    /// `Session::run` needs exclusive access
    session: Mutex<Session>,
    label_output: String,
    probability_output: Option<String>,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn from_file(path: &Path) -> Result<Self, ArtifactLoadError> {
        log::info!("Loading ONNX model from: {}", path.display());

        let session = Session::builder()
            .map_err(runtime_error(path))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(runtime_error(path))?
            .commit_from_file(path)
            .map_err(runtime_error(path))?;

        let label_output = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ArtifactLoadError::Incompatible {
                path: path.to_path_buf(),
                reason: "model defines no outputs".to_string(),
            })?;
        let probability_output = session.outputs.get(1).map(|o| o.name.clone());

        log::info!(
            "ONNX model loaded (label: {}, probabilities: {})",
            label_output,
            probability_output.as_deref().unwrap_or("none")
        );

        Ok(Self {
            session: Mutex::new(session),
            label_output,
            probability_output,
        })
    }

    fn run(
        &self,
        features: &FeatureVector,
        want_probabilities: bool,
    ) -> Result<(i64, Option<Vec<f64>>), InferenceError> {
        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), features.to_f32())
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let label = outputs
            .get(&self.label_output)
            .ok_or_else(|| InferenceError("No label output".to_string()))?
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError(format!("Extract label error: {}", e)))?
            .1
            .first()
            .copied()
            .ok_or_else(|| InferenceError("Empty label output".to_string()))?;

        let probabilities = match (&self.probability_output, want_probabilities) {
            (Some(name), true) => {
                let data = outputs
                    .get(name)
                    .ok_or_else(|| InferenceError("No probability output".to_string()))?
                    .try_extract_tensor::<f32>()
                    .map_err(|e| InferenceError(format!("Extract probability error: {}", e)))?
                    .1;
                Some(data.iter().map(|&p| p as f64).collect())
            }
            _ => None,
        };

        Ok((label, probabilities))
    }
}

fn runtime_error<E: std::fmt::Display>(path: &Path) -> impl Fn(E) -> ArtifactLoadError + '_ {
    move |e| ArtifactLoadError::Runtime {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
        self.run(features, false).map(|(label, _)| label)
    }

    fn supports_probabilities(&self) -> bool {
        self.probability_output.is_some()
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        self.run(features, true)?
            .1
            .ok_or_else(|| InferenceError("model has no probability output".to_string()))
    }

    fn infer(&self, features: &FeatureVector) -> Result<(i64, Option<Vec<f64>>), InferenceError> {
        self.run(features, true)
    }
}
