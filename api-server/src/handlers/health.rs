//! Health check handler

use axum::{extract::State, Json};
use screening_core::api::{self, HealthResponse};

use crate::AppState;

/// Healthy when a model is loaded, degraded otherwise; always 200
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(api::health(&state.service))
}
