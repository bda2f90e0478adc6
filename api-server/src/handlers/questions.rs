//! Questionnaire catalogue handler

use axum::{extract::State, Json};
use screening_core::api::{self, QuestionsResponse};

use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Json<QuestionsResponse> {
    Json(api::questions(&state.service))
}
