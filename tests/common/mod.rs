//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-memory application driven through `tower::ServiceExt::oneshot`
//! - A fake media host standing in for Cloudinary
//! - A `multipart/form-data` body builder
//! - Custom assertion macros

pub mod app;
pub mod media;
pub mod multipart;

// Re-export commonly used utilities
pub use app::*;
pub use media::*;
pub use multipart::*;
