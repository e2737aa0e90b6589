//! Workflow error type
//!
//! Every `AuthService` and `TaskService` operation returns [`ServiceResult`].
//! Lower layers (stores, password hashing, tokens) convert into it through the
//! `From` impls below, and the HTTP crate turns it into a response exactly once.

use serde::{Deserialize, Serialize};

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::models::task::ParseTaskStatusError;
use crate::store::StoreError;

/// Result type for workflow operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// One rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Input field name as it appears on the wire
    pub field: String,

    /// Human readable reason
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure kinds a workflow operation can report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Bad credentials or an unusable token
    ///
    /// Carries no payload, so an unknown username and a wrong password are
    /// indistinguishable.
    #[error("Invalid credentials")]
    Unauthorized,

    /// The resource already exists
    #[error("{0}")]
    Conflict(String),

    /// No such resource
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The resource exists but belongs to someone else
    #[error("You do not have access to this {0}")]
    Forbidden(&'static str),

    /// One or more input fields were rejected
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    /// Store, hashing or signing failure; the string is for logs only
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Validation failure for a single field
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![FieldViolation::new(field, message)])
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => {
                ServiceError::Conflict("Username already exists".to_string())
            }
            StoreError::TaskNotFound(_) => ServiceError::NotFound("Task"),
            StoreError::Database(_) | StoreError::Unavailable(_) => {
                tracing::error!(error = %err, "Store operation failed");
                ServiceError::Internal(err.to_string())
            }
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        tracing::error!(error = %err, "Password hashing failed");
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(_) => {
                tracing::error!(error = %err, "Token signing failed");
                ServiceError::Internal(err.to_string())
            }
            JwtError::ValidationError(_) | JwtError::Expired | JwtError::InvalidIssuer => {
                tracing::debug!(error = %err, "Token rejected");
                ServiceError::Unauthorized
            }
        }
    }
}

impl From<ParseTaskStatusError> for ServiceError {
    fn from(err: ParseTaskStatusError) -> Self {
        ServiceError::invalid("status", err.to_string())
    }
}
