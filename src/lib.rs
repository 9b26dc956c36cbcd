//! VidTube - Main Library
//!
//! VidTube is the backend of a video-sharing platform: user accounts, video
//! publishing, comments, likes, channel subscriptions and playlists, served
//! as a JSON REST API under `/api/v1`.
//!
//! # Module Structure
//!
//! - **`shared`** - Entity records, validation helpers and the response envelope
//!   - `User`, `Video`, `Comment`, `Like`, `Subscription`, `Playlist`
//!   - `ApiResponse` / `ApiErrorBody` envelopes
//!   - `SharedError` for field validation
//!
//! - **`backend`** - The axum server
//!   - Entity store (PostgreSQL via sqlx, or in-process)
//!   - Relationship aggregator (typed join recipes)
//!   - Paginator and toggle operations
//!   - Auth (bcrypt + JWT cookies), media upload relay, route wiring
//!
//! # Usage
//!
//! ```rust,no_run
//! use vidtube::backend::server::config::ServerConfig;
//! use vidtube::backend::server::init::create_app;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env();
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `Result<T, E>` with `?` propagation
//! - `shared::SharedError` for validation, `backend::store::StoreError` for
//!   persistence, `backend::error::BackendError` for everything HTTP-facing
//! - Every response, success or failure, is a JSON envelope

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
