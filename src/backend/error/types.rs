/**
 * Backend Error Types
 *
 * This module defines the HTTP-facing error type. Every handler returns
 * `Result<_, BackendError>`, and every variant maps to exactly one status
 * code and a client-safe message.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Raised directly by handlers with an explicit status:
 * - 400 missing or invalid fields
 * - 401 missing/invalid/expired tokens, bad credentials
 * - 403 acting on another user's resource
 * - 404 unknown user, channel, video, comment or playlist
 * - 409 duplicate username or email
 * - 501 unimplemented routes
 *
 * ## Wrapped Errors
 *
 * - `SharedError` - entity validation, always 400
 * - `StoreError` - persistence; 409 for conflicts, 503 when the database is
 *   unreachable, 500 otherwise
 *
 * Internal causes (driver errors, serialization failures) are logged when the
 * error is rendered and replaced by a generic message in the response body.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use vidtube::backend::error::BackendError;
///
/// let err = BackendError::not_found("Video not found");
/// let err = BackendError::forbidden("This is not your comment");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Shared error (entity validation)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Persistence error
    #[error(transparent)]
    StoreError(#[from] StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// 403 Forbidden
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// 409 Conflict
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, message)
    }

    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// 501 Not Implemented
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_IMPLEMENTED, message)
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `SharedError` - 400 for validation, 500 for serialization
    /// - `StoreError` - 409 conflict, 503 unreachable database, else 500
    /// - `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } | SharedError::MissingField { .. } => {
                    StatusCode::BAD_REQUEST
                }
            },
            Self::StoreError(err) => match err {
                StoreError::Conflict { .. } => StatusCode::CONFLICT,
                StoreError::Database(
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_),
                ) => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Database(_) | StoreError::Corrupt(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe error message
    ///
    /// Internal failures collapse to a generic message; their cause is only
    /// ever logged.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::SharedError(SharedError::MissingField { field }) => {
                format!("{} is required", field)
            }
            Self::StoreError(StoreError::Conflict { entity, .. }) => {
                format!("This {} already exists", entity)
            }
            _ if self.status_code() == StatusCode::SERVICE_UNAVAILABLE => {
                "Service temporarily unavailable".to_string()
            }
            _ => "Something went wrong".to_string(),
        }
    }

    /// Field names reported in the envelope's `errors` array
    pub fn errors(&self) -> Vec<String> {
        match self {
            Self::SharedError(err) => err.field().map(str::to_string).into_iter().collect(),
            Self::StoreError(StoreError::Conflict { detail, .. }) => vec![detail.clone()],
            _ => Vec::new(),
        }
    }
}
