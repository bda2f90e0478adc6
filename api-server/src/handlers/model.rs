//! Model status handler

use axum::{extract::State, Json};
use screening_core::api::{self, ModelInfoResponse};

use crate::AppState;

/// Loaded artifact metadata, load state and inference counters
pub async fn info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(api::model_info(&state.service))
}
