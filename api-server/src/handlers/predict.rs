//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use screening_core::api::{self, PredictionResponse};
use serde_json::Value;

use crate::{AppError, AppResult, AppState};

/// Screen one set of questionnaire answers
///
/// Body: `{"q1": 1..4, ..., "q30": 1..4}`
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    // Not-loaded wins over any problem with the body
    if !state.service.is_loaded() {
        tracing::warn!("Prediction requested before model load");
        return Err(AppError::ServiceUnavailable(
            "Model not loaded. Please try again later.".to_string(),
        ));
    }

    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest("Invalid JSON body. Please check your responses.".to_string())
    })?;

    let service = state.service.clone();
    let response = tokio::task::spawn_blocking(move || api::predict(&service, &body)).await??;

    Ok(Json(response))
}
