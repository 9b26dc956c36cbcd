//! Authentication Module
//!
//! This module handles user registration, login, and session management.
//! It provides HTTP handlers for the `/users` endpoints and manages
//! passwords, JWT tokens and session cookies.
//!
//! # Architecture
//!
//! - **`sessions`** - JWT access/refresh token generation and validation
//! - **`password`** - bcrypt hashing
//! - **`cookies`** - Session cookie helpers
//! - **`handlers`** - HTTP handlers for the user endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── sessions.rs     - JWT token management
//! ├── password.rs     - Password hashing
//! ├── cookies.rs      - accessToken / refreshToken cookies
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: Multipart form with avatar → User created (no tokens issued)
//! 2. **Login**: Email or username plus password → Token pair issued, refresh token stored, cookies set
//! 3. **Refresh**: Stored refresh token presented → Both tokens rotated
//! 4. **Logout**: Stored refresh token cleared, cookies removed
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Access and refresh tokens are signed with separate secrets
//! - Only the latest refresh token is accepted; rotation invalidates the previous one

/// JWT token generation and validation
pub mod sessions;

/// Password hashing
pub mod password;

/// Session cookies
pub mod cookies;

/// HTTP handlers for the user endpoints
pub mod handlers;

pub use sessions::{TokenKeys, TokenPair};
