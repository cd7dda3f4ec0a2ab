use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::assistant::ActionError;
use crate::export::ExportError;
use crate::render::bridge::BindingError;
use crate::store::photo::PhotoError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The document does not satisfy an AI action's preconditions.
    #[error("{0}")]
    AiRejected(String),

    #[error("{0}")]
    AiRateLimited(String),

    #[error("{0}")]
    AiFailed(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        let message = err.user_message();
        match err {
            ActionError::Rejected(_) => AppError::AiRejected(message),
            ActionError::RateLimited(_) => AppError::AiRateLimited(message),
            ActionError::Failed(_) => AppError::AiFailed(message),
            ActionError::Busy(_) => AppError::Conflict(message),
        }
    }
}

impl From<BindingError> for AppError {
    fn from(err: BindingError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        match err {
            PhotoError::NotAnImage(_) => AppError::UnsupportedMedia(err.to_string()),
            _ => AppError::Validation(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedMedia(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::AiRejected(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "AI_REJECTED",
                msg.clone(),
            ),
            AppError::AiRateLimited(msg) => (
                StatusCode::TOO_MANY_REQUESTS,
                "AI_RATE_LIMITED",
                msg.clone(),
            ),
            AppError::AiFailed(msg) => (StatusCode::BAD_GATEWAY, "AI_FAILED", msg.clone()),
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                let status = match e {
                    ExportError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, "EXPORT_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
