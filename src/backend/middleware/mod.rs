//! Middleware Module
//!
//! - **`auth`** - Access-token verification for protected routes

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
