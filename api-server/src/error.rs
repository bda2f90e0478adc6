//! Error handling

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use screening_core::{ArtifactLoadError, ErrorKind, ScreeningError};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

const GENERIC_FAILURE: &str = "An error occurred while processing your request. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Caller errors
    #[error("bad request: {0}")]
    BadRequest(String),

    // Service state
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    // Generic errors
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.as_str()),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
            }
        };

        error_body(status, error_message)
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "error": message,
        "status": status.as_u16()
    }));

    (status, body).into_response()
}

impl From<ScreeningError> for AppError {
    fn from(err: ScreeningError) -> Self {
        match err.kind() {
            ErrorKind::Validation => AppError::BadRequest(format!("Invalid input data: {}", err)),
            ErrorKind::NotLoaded => {
                AppError::ServiceUnavailable("Model not loaded. Please try again later.".to_string())
            }
            ErrorKind::Integrity | ErrorKind::Internal => AppError::InternalError(err.to_string()),
        }
    }
}

impl From<ArtifactLoadError> for AppError {
    fn from(err: ArtifactLoadError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("worker task failed: {}", err))
    }
}

/// `CatchPanicLayer` hook: same generic 500 as any other internal failure
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);
    error_body(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
}
