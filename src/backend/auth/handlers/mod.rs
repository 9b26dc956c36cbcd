//! User Handlers Module
//!
//! HTTP handlers for the `/api/v1/users` endpoints, organized into focused
//! submodules.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - User registration (multipart)
//! ├── login.rs     - Login and logout
//! ├── refresh.rs   - Access token refresh
//! ├── account.rs   - Current user, password, account details, images
//! └── channel.rs   - Channel profile and watch history
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /register
//! - **`login`** - POST /login
//! - **`logout`** - POST /logout (protected)
//! - **`refresh_token`** - POST /refresh-token
//! - **`change_password`** - POST /change-password (protected)
//! - **`current_user`** - GET /current-user (protected)
//! - **`update_account`** - PATCH /update-account (protected)
//! - **`update_avatar`** - PATCH /avatar (protected, multipart)
//! - **`update_cover_image`** - PATCH /cover-image (protected, multipart)
//! - **`channel_profile`** - GET /c/{username} (protected)
//! - **`watch_history`** - GET /history (protected)

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login and logout handlers
pub mod login;

/// Token refresh handler
pub mod refresh;

/// Handlers acting on the caller's own account
pub mod account;

/// Channel page and watch history
pub mod channel;

pub use types::{ChangePasswordRequest, LoginRequest, RefreshRequest, SessionResponse, UpdateAccountRequest};

pub use account::{change_password, current_user, update_account, update_avatar, update_cover_image};
pub use channel::{channel_profile, watch_history};
pub use login::{login, logout};
pub use refresh::refresh_token;
pub use register::register;
