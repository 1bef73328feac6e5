//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use spinfate_core::db::StoreError;

/// Error code carried by rate-limit rejections.
pub const LIMIT_REACHED: &str = "LIMIT_REACHED";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    LimitReached {
        message: String,
        days_left: Option<i64>,
    },

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_left: Option<i64>,
}

impl ErrorResponse {
    fn plain(error: String) -> Self {
        Self {
            error,
            message: None,
            days_left: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal messages are passed through as-is; they are diagnostic only.
        let (status, body) = match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, ErrorResponse::plain(m)),
            AppError::LimitReached { message, days_left } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse {
                    error: LIMIT_REACHED.to_string(),
                    message: Some(message),
                    days_left,
                },
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::plain("Not found".into()),
            ),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse::plain("Method not allowed".into()),
            ),
            AppError::Internal(m) => {
                tracing::error!(error = %m, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::plain(m))
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}
