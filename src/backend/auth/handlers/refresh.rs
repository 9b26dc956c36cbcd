/**
 * Token Refresh Handler
 *
 * POST /api/v1/users/refresh-token. The refresh token is read from the
 * `refreshToken` cookie or, failing that, from a JSON body. It must verify
 * and equal the token stored on the user; both tokens are then rotated.
 */

use axum::{body::Bytes, extract::State};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::auth::cookies::{with_session, REFRESH_COOKIE};
use crate::backend::auth::handlers::types::{RefreshRequest, SessionResponse};
use crate::backend::auth::sessions::subject_id;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::models::UserPatch;
use crate::shared::ApiResponse;

/// Refresh token from the cookie, else from the body
fn incoming_token(jar: &CookieJar, body: &[u8]) -> Option<String> {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice::<RefreshRequest>(body)
        .ok()
        .and_then(|request| request.refresh_token)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Refresh handler
///
/// # Errors
///
/// * `401 Unauthorized` - No token sent, token invalid or expired, or it is
///   not the one currently stored for the user
/// * `500 Internal Server Error` - Token generation or persistence fails
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, ApiResponse<SessionResponse>), BackendError> {
    let token = incoming_token(&jar, &body)
        .ok_or_else(|| BackendError::unauthorized("Unauthorized request"))?;

    let claims = state.tokens.verify_refresh_token(&token).map_err(|e| {
        tracing::warn!("Invalid refresh token: {:?}", e);
        BackendError::unauthorized("Invalid refresh token")
    })?;
    let user_id = subject_id(&claims.sub)
        .map_err(|_| BackendError::unauthorized("Invalid refresh token"))?;

    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| BackendError::unauthorized("Invalid refresh token"))?;

    if user.refresh_token.as_deref() != Some(token.as_str()) {
        tracing::warn!("Stale refresh token for user: {}", user.username);
        return Err(BackendError::unauthorized("Refresh token is expired or used"));
    }

    let tokens = state.tokens.issue_pair(&user).map_err(|e| {
        tracing::error!("Failed to create tokens: {:?}", e);
        BackendError::internal("Something went wrong while generating tokens")
    })?;
    state
        .store
        .update_user(user.id, UserPatch::refresh_token(Some(tokens.refresh_token.clone())))
        .await?;

    tracing::info!("Tokens refreshed for user: {}", user.username);

    let jar = with_session(jar, &tokens, state.config.secure_cookies);
    Ok((
        jar,
        ApiResponse::ok(
            SessionResponse {
                user: None,
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
            "Access token refreshed",
        ),
    ))
}
