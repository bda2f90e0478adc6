//! Screening Core - DASS questionnaire distress screening
//!
//! Turns 30 ordinal questionnaire answers into one of four severity classes
//! (None / Mild / Moderate / Severe) with a probability distribution, using
//! a classifier trained offline and loaded from an artifact directory.
//!
//! ```text
//! raw answers -> validate -> encode -> infer -> map -> PredictionResult
//! ```
//!
//! [`ModelService`] is the entry point: load once, then call `predict`
//! concurrently from any number of threads.

pub mod api;
pub mod constants;
pub mod error;
pub mod logic;

pub use error::{
    ArtifactLoadError, DomainError, ErrorKind, ScreeningError, ScreeningResult, ShapeError,
    ValidationError,
};
pub use logic::answers::{validate_integers, validate_json, validate_numbers, AnswerVector};
pub use logic::config::{ClassInfo, ClassTable};
pub use logic::loader::{ArtifactSettings, LoadReport};
pub use logic::mapping::{PredictionResult, ProbabilityMap};
pub use logic::model::{Classifier, InferenceError, ModelArtifact};
pub use logic::service::{ModelService, ServiceState, ServiceStatus};
