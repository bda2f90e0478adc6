//! Model Module - AI/ML Inference Engine
//!
//! Classifier runtimes, the loaded artifact and the inference step that
//! checks classifier output against the class table.

pub mod artifact;
pub mod classifier;
pub mod inference;
pub mod linear;
#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use artifact::{ArtifactMetadata, ModelArtifact};
pub use classifier::{Classifier, ClassifierFormat, InferenceError};
pub use inference::{infer, InferenceStats, RawPrediction, StatsSnapshot};
pub use linear::LinearClassifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
