/// Error handling for the API server
///
/// Handlers return `Result<T, ApiError>`. Workflow errors convert into
/// `ApiError` in one place (`From<ServiceError>`), and `IntoResponse` renders
/// every error with the same JSON envelope:
///
/// ```json
/// {
///   "status_code": 404,
///   "error": "not_found",
///   "message": "Task not found",
///   "timestamp": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// Validation failures add a `details` array of `{field, message}` objects.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskkeep_shared::auth::middleware::AuthError;
use taskkeep_shared::error::{FieldViolation, ServiceError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message for every rejected or missing bearer token
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or missing authentication token";

/// Message for every failed login
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Message sent in place of internal error details
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Unified API error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400), e.g. malformed JSON
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (409), e.g. duplicate username
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unprocessable entity (422)
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<FieldViolation>),

    /// Internal server error (500); the detail is logged, never sent
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body
    pub status_code: u16,

    /// Machine readable error code (e.g. "not_found")
    pub error: String,

    /// Human readable message
    pub message: String,

    /// Per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,

    /// When the error was produced
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The fixed 401 used for every token failure
    pub fn invalid_token() -> Self {
        ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_code, message, details) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::Forbidden(msg) => ("forbidden", msg, None),
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::Conflict(msg) => ("conflict", msg, None),
            ApiError::ValidationError(errors) => (
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!(error = %msg, "Internal error");
                ("internal_error", INTERNAL_ERROR_MESSAGE.to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            status_code: status.as_u16(),
            error: error_code.to_string(),
            message,
            details,
            timestamp: Utc::now(),
        });

        (status, body).into_response()
    }
}

/// Convert workflow errors to API errors
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized => {
                ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ServiceError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            ServiceError::Validation(violations) => ApiError::ValidationError(violations),
            ServiceError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert bearer extraction errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        tracing::debug!(error = %err, "Rejected authorization header");
        ApiError::invalid_token()
    }
}

/// Convert JSON body rejections to API errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ApiError::ValidationError(vec![FieldViolation::new(
                "body",
                err.body_text(),
            )]),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}
