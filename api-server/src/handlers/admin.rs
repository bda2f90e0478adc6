//! Admin handlers (mounted only when ALLOW_RELOAD is set)

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use screening_core::api::{self, ModelInfoResponse};
use serde::Serialize;

use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct ReloadResponse {
    reloaded_at: DateTime<Utc>,
    model: ModelInfoResponse,
}

/// Re-read the artifact directory; on failure the current model stays live
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    tracing::info!("Reload requested");

    let service = state.service.clone();
    let model = tokio::task::spawn_blocking(move || api::reload(&service)).await??;

    Ok(Json(ReloadResponse {
        reloaded_at: Utc::now(),
        model,
    }))
}
