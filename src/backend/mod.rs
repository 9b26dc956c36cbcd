//! Backend Module
//!
//! This module contains all server-side code: an Axum HTTP server exposing
//! the video-sharing API under `/api/v1`.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`store`** - `EntityStore` trait with PostgreSQL and in-process implementations
//! - **`aggregate`** - Typed join recipes producing the joined read views
//! - **`pagination`** - Page/limit slicing with caller-supplied labels
//! - **`toggle`** - Presence-flip like and subscription toggles
//! - **`auth`** - Passwords, JWT tokens, cookies and the user handlers
//! - **`media`** - Multipart staging and the media host upload relay
//! - **`middleware`** - Access-token authentication
//! - **`extract`** - Extractors whose rejections render as envelopes
//! - **`error`** - Backend error type and envelope rendering
//! - **`videos`**, **`comments`**, **`likes`**, **`subscriptions`**,
//!   **`playlists`**, **`healthcheck`** - Resource handlers
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── store/          - Entity store
//! ├── aggregate/      - Join recipes
//! ├── pagination.rs   - Paginator
//! ├── toggle.rs       - Toggle operations
//! ├── auth/           - Authentication and user handlers
//! ├── media/          - Upload relay
//! ├── middleware/     - Request middleware
//! ├── extract.rs      - Request extractors
//! ├── error/          - Error types
//! ├── videos/         - Video handlers
//! ├── comments/       - Comment handlers
//! ├── likes/          - Like handlers
//! ├── subscriptions/  - Subscription handlers
//! ├── playlists/      - Playlist handlers
//! └── healthcheck.rs  - Liveness endpoint
//! ```
//!
//! # Request Flow
//!
//! request → `auth_middleware` resolves the user (protected routes) →
//! handler validates fields → `EntityStore` loads or mutates records →
//! aggregate recipe joins → `Paginator` slices → `ApiResponse` envelope.
//!
//! # State Management
//!
//! `AppState` is built once at startup and cloned per request. It holds only
//! `Arc`s to immutable configuration and to the store, which does its own
//! synchronization.
//!
//! # Error Handling
//!
//! Handlers return `Result<ApiResponse<T>, BackendError>`. `StoreError` and
//! `SharedError` convert into `BackendError` via `From`, and every error
//! renders as the failure envelope with a matching HTTP status.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Entity store
pub mod store;

/// Relationship aggregator
pub mod aggregate;

/// Paginator
pub mod pagination;

/// Like and subscription toggles
pub mod toggle;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Media upload relay
pub mod media;

/// Middleware for request processing
pub mod middleware;

/// Request extractors
pub mod extract;

/// Video endpoints
pub mod videos;

/// Comment endpoints
pub mod comments;

/// Like endpoints
pub mod likes;

/// Subscription endpoints
pub mod subscriptions;

/// Playlist endpoints
pub mod playlists;

/// Liveness endpoint
pub mod healthcheck;

pub use error::BackendError;
pub use server::create_app;
pub use store::{EntityStore, MemoryStore, PgStore, StoreError};
