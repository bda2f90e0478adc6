//! Service Commands - transport-neutral entry points
//!
//! Each command takes the shared [`ModelService`] and returns a response
//! schema. HTTP handlers (or any other front end) only translate the
//! error into their own status codes.

use serde_json::Value;

use crate::error::{ArtifactLoadError, ScreeningResult};
use crate::logic::service::ModelService;

use super::schema::{HealthResponse, ModelInfoResponse, PredictionResponse, QuestionsResponse};

// ============================================================================
// HEALTH
// ============================================================================

pub fn health(service: &ModelService) -> HealthResponse {
    HealthResponse::new(service.is_loaded(), service.version())
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Validate a raw request body and predict
pub fn predict(service: &ModelService, body: &Value) -> ScreeningResult<PredictionResponse> {
    service.predict_json(body).map(PredictionResponse::from)
}

// ============================================================================
// CATALOGUE & MODEL
// ============================================================================

pub fn questions(service: &ModelService) -> QuestionsResponse {
    QuestionsResponse::new(&service.class_table())
}

pub fn model_info(service: &ModelService) -> ModelInfoResponse {
    ModelInfoResponse::new(
        service.status(),
        service.metadata(),
        service.class_source().map(|p| p.display().to_string()),
    )
}

/// Reload artifacts from the configured directory
pub fn reload(service: &ModelService) -> Result<ModelInfoResponse, ArtifactLoadError> {
    service.reload()?;
    Ok(model_info(service))
}
