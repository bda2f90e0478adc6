//! Feature Encoder - answers to model-ready features
//!
//! **No validation happens here.** The encoder trusts that its
//! `AnswerVector` came out of the validator.

use serde::Serialize;

use crate::logic::answers::AnswerVector;
use crate::logic::model::ModelArtifact;

use super::layout::FeatureLayout;
use super::scaler::StandardScaler;

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Ordered numeric input for the classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    /// Fingerprint of the layout that produced this vector
    pub layout_hash: u32,
    /// Whether the scaler was applied
    pub scaled: bool,
    /// One value per feature name, in training order
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Single precision copy for tensor runtimes
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }
}

// ============================================================================
// ENCODING
// ============================================================================

/// Encode with the layout and scaler of a loaded artifact
pub fn encode(answers: &AnswerVector, artifact: &ModelArtifact) -> FeatureVector {
    encode_with(answers, artifact.layout(), artifact.scaler())
}

/// Gather answers in layout order, then normalize if a scaler is present
pub fn encode_with(
    answers: &AnswerVector,
    layout: &FeatureLayout,
    scaler: Option<&StandardScaler>,
) -> FeatureVector {
    let raw = answers.as_slice();
    let mut values: Vec<f64> = layout.columns().iter().map(|&c| raw[c] as f64).collect();

    let scaled = match scaler {
        Some(scaler) => {
            scaler.apply(&mut values);
            true
        }
        None => false,
    };

    FeatureVector {
        layout_hash: layout.hash(),
        scaled,
        values,
    }
}
