//! HTTP mapping for application errors
//!
//! A single translation point from the core error taxonomy to
//! responses. Internal detail is logged server-side; callers only ever
//! see the generic shapes below.

use aerobook_core::error::AerobookError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper turning an [`AerobookError`] into an HTTP response
#[derive(Debug)]
pub struct ApiError(pub AerobookError);

impl From<AerobookError> for ApiError {
    fn from(err: AerobookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.log();

        let (status, body) = match &self.0 {
            AerobookError::RateLimited {
                retry_after_secs, ..
            } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "error": "Rate limit exceeded",
                    "message": "Too many requests.",
                    "retryAfter": retry_after_secs,
                }),
            ),
            AerobookError::Authentication { message, .. } => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "Unauthorized",
                    "message": message,
                }),
            ),
            AerobookError::RoleNotAssigned { role, .. } => (
                StatusCode::FORBIDDEN,
                json!({
                    "success": false,
                    "error": "role_not_assigned",
                    "message": format!("Cannot switch to role: {}", role),
                    "role": role,
                }),
            ),
            // Covers both true absence and ownership mismatch; callers
            // must not be able to tell the two apart
            AerobookError::NotFound { resource, .. } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": resource,
                }),
            ),
            AerobookError::Validation { message, field, .. } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": message,
                    "field": field,
                }),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "internal_error",
                    "message": "Internal server error",
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
