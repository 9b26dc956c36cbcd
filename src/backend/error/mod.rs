//! Backend Error Module
//!
//! This module defines the error type returned by every HTTP handler and
//! its conversion into the failure envelope.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and its status mapping
//! └── conversion.rs - IntoResponse for errors and success envelopes
//! ```
//!
//! # HTTP Response Conversion
//!
//! `BackendError` implements `IntoResponse`, so handlers return
//! `Result<ApiResponse<T>, BackendError>` and both arms render as envelopes.
//!
//! # Example
//!
//! ```rust,no_run
//! use vidtube::backend::error::BackendError;
//! use vidtube::shared::ApiResponse;
//!
//! async fn handler() -> Result<ApiResponse<()>, BackendError> {
//!     Err(BackendError::not_found("Video not found"))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;

/// Result type returned by handlers
pub type ApiResult<T> = Result<crate::shared::ApiResponse<T>, BackendError>;
