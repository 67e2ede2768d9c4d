//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use flowguard_core::PipelineError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors
    #[error("invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    // Model errors
    #[error("{0}")]
    ModelError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidInput { field, reason } => {
                tracing::debug!("Rejected input: {}", self);
                (
                    StatusCode::BAD_REQUEST,
                    json!({"error": "invalid input", "field": field, "detail": reason}),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "invalid input", "detail": msg}),
            ),
            AppError::UnsupportedMediaType(content_type) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                json!({"error": "unsupported media type", "detail": content_type}),
            ),
            AppError::ModelError(msg) => {
                tracing::error!("Model error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({"error": msg}))
            }
        };

        let mut body = body;
        body["status"] = json!(status.as_u16());

        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput { field, reason } => AppError::InvalidInput { field, reason },
            other @ PipelineError::BinaryStage(_) => AppError::ModelError(other.to_string()),
        }
    }
}
