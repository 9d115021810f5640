//! Error types for canvass-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request outside the validation taxonomy (400),
    /// e.g. an unparseable id in the path
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// canvass-common error, carrying the domain taxonomy
    #[error(transparent)]
    Common(#[from] canvass_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use canvass_common::Error;

        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Common(err) => match err {
                Error::InvalidInput(msg) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_INPUT", msg)
                }
                Error::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
                Error::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
                Error::EmptyReport(msg) => (StatusCode::BAD_REQUEST, "EMPTY_REPORT", msg),
                Error::Config(msg) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    msg,
                ),
                Error::Transport(msg) => (StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR", msg),
                Error::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", msg),
                Error::Database(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    e.to_string(),
                ),
                Error::Io(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    e.to_string(),
                ),
                Error::Internal(msg) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
