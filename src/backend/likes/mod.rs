//! Likes
//!
//! Routes under `/api/v1/likes`. Video and comment likes are toggles; tweet
//! likes are not supported and answer 501.

use axum::extract::{Path, State};
use uuid::Uuid;

use crate::backend::aggregate::{recipes, LikedVideo};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::extract::parse_id;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::toggle::{self, LikeToggle};
use crate::shared::models::LikeTarget;
use crate::shared::ApiResponse;

async fn toggle_target(
    state: &AppState,
    user_id: Uuid,
    target: LikeTarget,
) -> ApiResult<LikeToggle> {
    let outcome = toggle::toggle_like(state.store.as_ref(), user_id, target).await?;
    let message = if outcome.is_present() { "Liked" } else { "Like removed" };
    Ok(ApiResponse::ok(LikeToggle::from(outcome), message))
}

/// POST /toggle/v/{videoId}
pub async fn toggle_video_like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(video_id): Path<String>,
) -> ApiResult<LikeToggle> {
    let video_id = parse_id(&video_id, "video")?;
    toggle_target(&state, user.id, LikeTarget::Video(video_id)).await
}

/// POST /toggle/c/{commentId}
pub async fn toggle_comment_like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<String>,
) -> ApiResult<LikeToggle> {
    let comment_id = parse_id(&comment_id, "comment")?;
    toggle_target(&state, user.id, LikeTarget::Comment(comment_id)).await
}

/// POST /toggle/t/{tweetId}
pub async fn toggle_tweet_like(
    AuthUser(user): AuthUser,
    Path(tweet_id): Path<String>,
) -> ApiResult<LikeToggle> {
    tracing::warn!("Tweet like requested by {} for {}", user.username, tweet_id);
    Err(BackendError::not_implemented("Tweet likes are not supported"))
}

/// GET /videos: the caller's liked videos with owners nested in
pub async fn liked_videos(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Vec<LikedVideo>> {
    let liked = recipes::liked_videos(state.store.as_ref(), user.id).await?;
    Ok(ApiResponse::ok(liked, "Liked videos fetched successfully"))
}
