//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, global layers and fallback
//! - **`api_routes`** - The `/api/v1` resources and their auth split
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - Per-resource route tables
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vidtube::backend::media::DisabledMediaHost;
//! use vidtube::backend::routes::create_router;
//! use vidtube::backend::server::config::ServerConfig;
//! use vidtube::backend::server::state::AppState;
//! use vidtube::backend::store::MemoryStore;
//!
//! let state = AppState::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(DisabledMediaHost),
//!     ServerConfig::default(),
//! );
//! let router = create_router(state);
//! ```

/// Main router creation
pub mod router;

/// API route tables
pub mod api_routes;

pub use router::create_router;
