//! Joined read views
//!
//! Shapes produced by the recipes. Foreign keys that a recipe joins are
//! replaced by a projected summary (`owner`, `subscriber`, `channel`,
//! `video`); a summary is `null` when the referenced record is gone.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::shared::models::{Comment, Like, Playlist, Subscription, User, Video};

/// Whitelisted projection of a user joined onto another record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub avatar: String,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoWithOwner {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner: Option<OwnerSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoWithOwner {
    pub fn new(video: Video, owner: Option<OwnerSummary>) -> Self {
        Self {
            id: video.id,
            title: video.title,
            description: video.description,
            video_file: video.video_file,
            thumbnail: video.thumbnail,
            duration: video.duration,
            views: video.views,
            is_published: video.is_published,
            owner,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithOwner {
    pub id: Uuid,
    pub content: String,
    pub video: Uuid,
    pub owner: Option<OwnerSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentWithOwner {
    pub fn new(comment: Comment, owner: Option<OwnerSummary>) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            video: comment.video_id,
            owner,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// A video like with its target video (and that video's owner) joined in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideo {
    pub id: Uuid,
    pub liked_by: Uuid,
    pub video: Option<VideoWithOwner>,
    pub created_at: DateTime<Utc>,
}

impl LikedVideo {
    pub fn new(like: Like, video: Option<VideoWithOwner>) -> Self {
        Self {
            id: like.id,
            liked_by: like.liked_by,
            video,
            created_at: like.created_at,
        }
    }
}

/// Public channel page for a user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub avatar: String,
    pub cover_image: String,
    pub subscribers_count: usize,
    pub channels_subscribed_to_count: usize,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
}

/// Subscription seen from the channel side
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberEntry {
    pub id: Uuid,
    pub subscriber: Option<OwnerSummary>,
    pub channel: Uuid,
    pub created_at: DateTime<Utc>,
}

impl SubscriberEntry {
    pub fn new(subscription: Subscription, subscriber: Option<OwnerSummary>) -> Self {
        Self {
            id: subscription.id,
            subscriber,
            channel: subscription.channel_id,
            created_at: subscription.created_at,
        }
    }
}

/// Subscription seen from the subscriber side
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedChannel {
    pub id: Uuid,
    pub subscriber: Uuid,
    pub channel: Option<OwnerSummary>,
    pub created_at: DateTime<Utc>,
}

impl SubscribedChannel {
    pub fn new(subscription: Subscription, channel: Option<OwnerSummary>) -> Self {
        Self {
            id: subscription.id,
            subscriber: subscription.subscriber_id,
            channel,
            created_at: subscription.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistWithVideos {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub duration: f64,
    pub owner: Option<OwnerSummary>,
    pub videos: Vec<VideoWithOwner>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaylistWithVideos {
    pub fn new(playlist: Playlist, owner: Option<OwnerSummary>, videos: Vec<VideoWithOwner>) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            duration: playlist.duration,
            owner,
            videos,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        }
    }
}
