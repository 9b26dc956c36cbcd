/**
 * Toggle Operations
 *
 * Likes and subscriptions are presence-based: a (actor, target) pair is
 * either Absent or Present, and a toggle flips it. There is no counter and
 * no intermediate state.
 *
 * The flip itself is one store call (`EntityStore::toggle_like`,
 * `EntityStore::toggle_subscription`). The functions here validate the
 * target before flipping.
 */

use serde::Serialize;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::store::EntityStore;
use crate::shared::models::{Like, LikeTarget, Subscription};

/// Result of a presence flip, carrying the record that was created or deleted
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome<T> {
    /// Absent → Present
    Added(T),
    /// Present → Absent
    Removed(T),
}

impl<T> ToggleOutcome<T> {
    /// Whether the pair is present after the flip
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    pub fn record(&self) -> &T {
        match self {
            Self::Added(record) | Self::Removed(record) => record,
        }
    }

    pub fn into_record(self) -> T {
        match self {
            Self::Added(record) | Self::Removed(record) => record,
        }
    }
}

/// Payload returned by the like toggle endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub is_liked: bool,
    pub like: Like,
}

impl From<ToggleOutcome<Like>> for LikeToggle {
    fn from(outcome: ToggleOutcome<Like>) -> Self {
        Self {
            is_liked: outcome.is_present(),
            like: outcome.into_record(),
        }
    }
}

/// Payload returned by the subscription toggle endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionToggle {
    pub is_subscribed: bool,
    pub subscription: Subscription,
}

impl From<ToggleOutcome<Subscription>> for SubscriptionToggle {
    fn from(outcome: ToggleOutcome<Subscription>) -> Self {
        Self {
            is_subscribed: outcome.is_present(),
            subscription: outcome.into_record(),
        }
    }
}

/// Like or unlike a video or comment.
///
/// # Errors
///
/// * `404 Not Found` - The target video or comment does not exist
pub async fn toggle_like(
    store: &dyn EntityStore,
    user_id: Uuid,
    target: LikeTarget,
) -> Result<ToggleOutcome<Like>, BackendError> {
    match target {
        LikeTarget::Video(video_id) => {
            if store.find_video_by_id(video_id).await?.is_none() {
                return Err(BackendError::not_found("Video not found"));
            }
        }
        LikeTarget::Comment(comment_id) => {
            if store.find_comment_by_id(comment_id).await?.is_none() {
                return Err(BackendError::not_found("Comment not found"));
            }
        }
    }

    let outcome = store.toggle_like(user_id, target).await?;
    tracing::info!(
        "Like {} by {} on {:?}",
        if outcome.is_present() { "added" } else { "removed" },
        user_id,
        target
    );
    Ok(outcome)
}

/// Subscribe to or unsubscribe from a channel.
///
/// # Errors
///
/// * `400 Bad Request` - A user cannot subscribe to their own channel
/// * `404 Not Found` - The channel does not exist
pub async fn toggle_subscription(
    store: &dyn EntityStore,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<ToggleOutcome<Subscription>, BackendError> {
    if subscriber_id == channel_id {
        return Err(BackendError::bad_request("You cannot subscribe to your own channel"));
    }
    if store.find_user_by_id(channel_id).await?.is_none() {
        return Err(BackendError::not_found("Channel does not exist"));
    }

    let outcome = store.toggle_subscription(subscriber_id, channel_id).await?;
    tracing::info!(
        "Subscription {} -> {} {}",
        subscriber_id,
        channel_id,
        if outcome.is_present() { "created" } else { "removed" }
    );
    Ok(outcome)
}
