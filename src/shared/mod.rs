//! Shared Module
//!
//! Types that carry no HTTP or database behaviour of their own: entity
//! records, their validated constructors, the response envelope and the
//! validation error type.

/// Entity records and field-level updates
pub mod models;

/// Success and error envelopes
pub mod envelope;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use envelope::{ApiErrorBody, ApiResponse, Empty};
pub use error::SharedError;
pub use models::{Comment, Like, LikeTarget, Playlist, Subscription, User, Video};
