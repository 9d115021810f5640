//! Authentication middleware for admin routes
//!
//! Validates the `Authorization: Bearer <token>` header against the
//! configured admin token and yields a principal for the request. An unset
//! token disables the check entirely (local/development convention, same as
//! running without credentials).

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// The authenticated caller, made available to downstream handlers
#[derive(Debug, Clone)]
pub struct Principal {
    pub name: String,
}

/// Admin authentication middleware
///
/// Returns 401 Unauthorized when the bearer token is missing or wrong.
/// Applied per-route; health and submission endpoints never see it.
pub async fn admin_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        // No token configured - auth disabled, pass through
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingCredential)?;

    if provided != expected {
        warn!("Admin request rejected: bearer token mismatch");
        return Err(AuthError::InvalidCredential);
    }

    request.extensions_mut().insert(Principal {
        name: "admin".to_string(),
    });

    Ok(next.run(request).await)
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingCredential,
    InvalidCredential,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingCredential => "Missing bearer credential",
            AuthError::InvalidCredential => "Invalid bearer credential",
        };

        let body = Json(json!({
            "error": {
                "code": "UNAUTHORIZED",
                "message": message,
            }
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
