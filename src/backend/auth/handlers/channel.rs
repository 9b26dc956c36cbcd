/**
 * Channel Handlers
 *
 * GET /api/v1/users/c/{username} renders a channel page with subscription
 * counts; GET /api/v1/users/history hydrates the caller's watch history.
 */

use axum::extract::{Path, State};

use crate::backend::aggregate::{recipes, ChannelProfile, VideoWithOwner};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::ApiResponse;

/// Channel profile for `username`, with `isSubscribed` relative to the caller
///
/// # Errors
///
/// * `400 Bad Request` - Blank username
/// * `404 Not Found` - No such channel
pub async fn channel_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(username): Path<String>,
) -> ApiResult<ChannelProfile> {
    if username.trim().is_empty() {
        return Err(BackendError::bad_request("username is missing"));
    }

    let profile = recipes::channel_profile(state.store.as_ref(), &username, Some(user.id))
        .await?
        .ok_or_else(|| {
            tracing::warn!("Channel not found: {}", username);
            BackendError::not_found("Channel does not exist")
        })?;

    Ok(ApiResponse::ok(profile, "User channel fetched successfully"))
}

/// Caller's watch history, oldest first
pub async fn watch_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Vec<VideoWithOwner>> {
    let history = recipes::watch_history(state.store.as_ref(), user.id).await?;
    Ok(ApiResponse::ok(history, "Watch history fetched successfully"))
}
