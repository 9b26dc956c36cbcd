/**
 * Login and Logout Handlers
 *
 * This module implements POST /api/v1/users/login and POST /api/v1/users/logout.
 *
 * # Authentication Process
 *
 * 1. Look up the user by email or username
 * 2. Verify password using bcrypt
 * 3. Issue an access/refresh token pair
 * 4. Store the refresh token on the user and set both cookies
 *
 * # Security
 *
 * - Password verification uses bcrypt's constant-time comparison
 * - Only the most recently issued refresh token is accepted
 * - Logout clears the stored refresh token, so it cannot be replayed
 */

use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;

use crate::backend::auth::cookies::{with_session, without_session};
use crate::backend::auth::handlers::types::{LoginRequest, SessionResponse};
use crate::backend::auth::password::verify_password;
use crate::backend::error::BackendError;
use crate::backend::extract::JsonBody;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::error::require_secret;
use crate::shared::models::UserPatch;
use crate::shared::{ApiResponse, Empty};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - Neither email nor username given, or password missing
/// * `404 Not Found` - No account matches
/// * `401 Unauthorized` - Password does not match
/// * `500 Internal Server Error` - Token generation or persistence fails
///
/// # Example Request
///
/// ```http
/// POST /api/v1/users/login HTTP/1.1
/// Content-Type: application/json
///
/// { "email": "a@b.com", "password": "pw" }
/// ```
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<SessionResponse>), BackendError> {
    let email = non_blank(request.email);
    let username = non_blank(request.username);
    if email.is_none() && username.is_none() {
        return Err(BackendError::bad_request("username or email is required"));
    }
    let password = require_secret("password", request.password.as_deref().unwrap_or_default())?;

    let user = state
        .store
        .find_user_by_username_or_email(
            username.as_deref().unwrap_or_default(),
            email.as_deref().unwrap_or_default(),
        )
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login for unknown account: {:?} / {:?}", username, email);
            BackendError::not_found("User does not exist")
        })?;

    if !verify_password(&password, &user.password_hash)? {
        tracing::warn!("Invalid password for user: {}", user.username);
        return Err(BackendError::unauthorized("Invalid user credentials"));
    }

    let tokens = state.tokens.issue_pair(&user).map_err(|e| {
        tracing::error!("Failed to create tokens: {:?}", e);
        BackendError::internal("Something went wrong while generating tokens")
    })?;

    let user = state
        .store
        .update_user(user.id, UserPatch::refresh_token(Some(tokens.refresh_token.clone())))
        .await?
        .ok_or_else(|| BackendError::not_found("User does not exist"))?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    let jar = with_session(jar, &tokens, state.config.secure_cookies);
    Ok((
        jar,
        ApiResponse::ok(
            SessionResponse {
                user: Some(user),
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
            "User logged in successfully",
        ),
    ))
}

/// Logout handler
///
/// Clears the stored refresh token and both session cookies.
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<Empty>), BackendError> {
    state
        .store
        .update_user(user.id, UserPatch::refresh_token(None))
        .await?;

    tracing::info!("User logged out: {}", user.username);
    Ok((without_session(jar), ApiResponse::ok(Empty {}, "User logged out")))
}
