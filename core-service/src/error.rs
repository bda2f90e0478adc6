//! Error taxonomy for the screening pipeline
//!
//! Every fallible operation returns one of these types. `ErrorKind` lets the
//! transport layer pick a status code and a log level without matching on
//! every variant.

use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{MAX_ANSWER, MIN_ANSWER};

pub type ScreeningResult<T> = Result<T, ScreeningError>;

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// The input did not decompose into the expected number of answers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} answers, got {actual}")]
pub struct ShapeError {
    pub expected: usize,
    pub actual: usize,
}

/// An answer was out of range or not numeric
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "answer q{} must be an integer between {} and {}, got {value}",
    .index + 1, MIN_ANSWER, MAX_ANSWER
)]
pub struct DomainError {
    /// Zero-based position in canonical item order
    pub index: usize,
    /// Offending value as received
    pub value: String,
}

/// Rejection raised by the answer validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

// ============================================================================
// ARTIFACT ERRORS
// ============================================================================

/// Failure to assemble a usable model artifact
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("no classifier found (searched: {})", display_paths(.searched))]
    ClassifierMissing { searched: Vec<PathBuf> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("incompatible artifact {}: {reason}", .path.display())]
    Incompatible { path: PathBuf, reason: String },

    #[error("model runtime rejected {}: {reason}", .path.display())]
    Runtime { path: PathBuf, reason: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// PIPELINE ERRORS
// ============================================================================

/// Coarse classification used for status codes and log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller sent a malformed answer vector
    Validation,
    /// No artifact has been published yet
    NotLoaded,
    /// The loaded artifact is structurally incompatible
    Integrity,
    /// Anything else
    Internal,
}

#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("model not loaded")]
    NotLoaded,

    #[error(transparent)]
    ArtifactLoad(#[from] ArtifactLoadError),

    #[error("model integrity violation: {0}")]
    ModelIntegrity(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl ScreeningError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScreeningError::Validation(_) => ErrorKind::Validation,
            ScreeningError::NotLoaded => ErrorKind::NotLoaded,
            ScreeningError::ModelIntegrity(_) => ErrorKind::Integrity,
            ScreeningError::ArtifactLoad(_) | ScreeningError::Inference(_) => ErrorKind::Internal,
        }
    }

    /// Expected conditions are logged at warning level, the rest at error
    pub fn is_expected(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::NotLoaded)
    }
}

impl From<ShapeError> for ScreeningError {
    fn from(err: ShapeError) -> Self {
        ScreeningError::Validation(err.into())
    }
}

impl From<DomainError> for ScreeningError {
    fn from(err: DomainError) -> Self {
        ScreeningError::Validation(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_names_item() {
        let err = DomainError { index: 6, value: "5".to_string() };
        assert_eq!(err.to_string(), "answer q7 must be an integer between 1 and 4, got 5");
    }

    #[test]
    fn test_error_kinds() {
        let shape: ScreeningError = ShapeError { expected: 30, actual: 29 }.into();
        assert_eq!(shape.kind(), ErrorKind::Validation);
        assert!(shape.is_expected());

        assert_eq!(ScreeningError::NotLoaded.kind(), ErrorKind::NotLoaded);
        assert!(ScreeningError::NotLoaded.is_expected());

        let integrity = ScreeningError::ModelIntegrity("3 probabilities".into());
        assert_eq!(integrity.kind(), ErrorKind::Integrity);
        assert!(!integrity.is_expected());

        assert_eq!(ScreeningError::Inference("boom".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_classifier_missing_lists_paths() {
        let err = ArtifactLoadError::ClassifierMissing {
            searched: vec![PathBuf::from("a/model.onnx"), PathBuf::from("a/model.json")],
        };
        assert_eq!(err.to_string(), "no classifier found (searched: a/model.onnx, a/model.json)");
    }
}
