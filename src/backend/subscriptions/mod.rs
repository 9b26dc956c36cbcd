//! Subscriptions
//!
//! Routes under `/api/v1/subscriptions`. `POST /c/{channelId}` toggles the
//! caller's subscription; the list endpoints fan out over subscribers or
//! subscribed channels.

use axum::extract::{Path, State};

use crate::backend::aggregate::{recipes, SubscribedChannel, SubscriberEntry};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::extract::parse_id;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::toggle::{self, SubscriptionToggle};
use crate::shared::ApiResponse;

/// Subscribe to or unsubscribe from a channel
pub async fn toggle_subscription(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(channel_id): Path<String>,
) -> ApiResult<SubscriptionToggle> {
    let channel_id = parse_id(&channel_id, "channel")?;
    let outcome = toggle::toggle_subscription(state.store.as_ref(), user.id, channel_id).await?;
    let message = if outcome.is_present() { "Subscribed" } else { "Unsubscribed" };
    Ok(ApiResponse::ok(SubscriptionToggle::from(outcome), message))
}

/// Subscribers of a channel; only the channel owner may list them
pub async fn channel_subscribers(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(channel_id): Path<String>,
) -> ApiResult<Vec<SubscriberEntry>> {
    let channel_id = parse_id(&channel_id, "channel")?;
    if channel_id != user.id {
        tracing::warn!("User {} asked for subscribers of {}", user.username, channel_id);
        return Err(BackendError::forbidden("This channel is not owned by you"));
    }

    let subscribers = recipes::channel_subscribers(state.store.as_ref(), channel_id).await?;
    Ok(ApiResponse::ok(subscribers, "Subscribers list fetched successfully"))
}

/// Channels a user is subscribed to
pub async fn subscribed_channels(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(subscriber_id): Path<String>,
) -> ApiResult<Vec<SubscribedChannel>> {
    let subscriber_id = parse_id(&subscriber_id, "subscriber")?;
    let channels = recipes::subscribed_channels(state.store.as_ref(), subscriber_id).await?;
    Ok(ApiResponse::ok(channels, "Channel list fetched successfully"))
}
