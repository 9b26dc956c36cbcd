//! Shared Error Types
//!
//! This module defines the validation errors raised while building entity
//! records from request input. They are independent of HTTP; the backend
//! maps every variant to a `400 Bad Request` envelope.
//!
//! # Error Categories
//!
//! - `ValidationError` - A field is present but its value is not acceptable
//! - `MissingField` - A required field is absent or blank after trimming
//! - `SerializationError` - JSON serialization/deserialization failures
//!
//! # Usage
//!
//! ```rust
//! use vidtube::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Invalid email format");
//! let missing = SharedError::missing("content");
//! ```
use thiserror::Error;

/// Validation errors shared by every entity constructor
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Required field absent or blank
    #[error("Field '{field}' is required")]
    MissingField {
        /// The missing field
        field: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new missing-field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Name of the offending field, if the error concerns one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } | Self::MissingField { field } => Some(field),
            Self::SerializationError { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Trim `value` and reject it when nothing is left.
///
/// Returns the trimmed, owned string so constructors can store it directly.
pub fn require_non_blank(field: &str, value: &str) -> Result<String, SharedError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SharedError::missing(field));
    }
    Ok(trimmed.to_string())
}

/// Reject a blank secret but keep it byte for byte.
///
/// Passwords are hashed and compared exactly as typed, surrounding
/// whitespace included.
pub fn require_secret(field: &str, value: &str) -> Result<String, SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::missing(field));
    }
    Ok(value.to_string())
}
