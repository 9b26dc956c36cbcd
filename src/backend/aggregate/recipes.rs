/**
 * Join Recipes
 *
 * Each recipe loads a primary set from the store, batch-loads the secondary
 * set it references by id, and joins the two through a `Lookup`. Nested
 * joins (like → video → owner) run the same step twice.
 *
 * Recipes never fail because a reference dangles: a missing 1:1 target
 * collapses to `None`, and a missing element of an ordered id list (watch
 * history, playlist videos) is skipped.
 */

use std::collections::HashSet;

use uuid::Uuid;

use super::lookup::{collapse, Lookup};
use super::views::{
    ChannelProfile, CommentWithOwner, LikedVideo, OwnerSummary, PlaylistWithVideos,
    SubscribedChannel, SubscriberEntry, VideoWithOwner,
};
use crate::backend::pagination::PageRequest;
use crate::backend::store::{EntityStore, Slice, StoreResult};
use crate::shared::models::{User, Video, VideoListQuery};

fn distinct(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Batch-load users and index them by id
async fn users_by_id(
    store: &dyn EntityStore,
    ids: impl IntoIterator<Item = Uuid>,
) -> StoreResult<Lookup<Uuid, User>> {
    let ids = distinct(ids);
    let users = if ids.is_empty() {
        Vec::new()
    } else {
        store.find_users_by_ids(&ids).await?
    };
    Ok(Lookup::new(users, |u| u.id))
}

fn summary(matches: &[User]) -> Option<OwnerSummary> {
    collapse(matches).map(OwnerSummary::from)
}

/// Join each video with its owner summary, preserving input order
pub async fn attach_owners(
    store: &dyn EntityStore,
    videos: Vec<Video>,
) -> StoreResult<Vec<VideoWithOwner>> {
    let owners = users_by_id(store, videos.iter().map(|v| v.owner_id)).await?;
    Ok(owners.join(videos, |v| v.owner_id, |video, matched| {
        VideoWithOwner::new(video, summary(matched))
    }))
}

/// Hydrate an ordered list of video ids, skipping ids with no video
async fn videos_in_order(store: &dyn EntityStore, ids: &[Uuid]) -> StoreResult<Vec<VideoWithOwner>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = Lookup::new(store.find_videos_by_ids(ids).await?, |v| v.id);
    let ordered: Vec<Video> = ids.iter().filter_map(|id| found.first(id).cloned()).collect();
    attach_owners(store, ordered).await
}

/// One page of the text search over all videos, sorted, owners joined
pub async fn video_list(
    store: &dyn EntityStore,
    query: &VideoListQuery,
    request: PageRequest,
) -> StoreResult<Slice<VideoWithOwner>> {
    let Slice { items, total } = store
        .search_videos(query, request.skip(), request.limit)
        .await?;
    Ok(Slice {
        items: attach_owners(store, items).await?,
        total,
    })
}

pub async fn video_with_owner(
    store: &dyn EntityStore,
    video_id: Uuid,
) -> StoreResult<Option<VideoWithOwner>> {
    match store.find_video_by_id(video_id).await? {
        Some(video) => Ok(attach_owners(store, vec![video]).await?.into_iter().next()),
        None => Ok(None),
    }
}

pub async fn videos_by_owner(
    store: &dyn EntityStore,
    owner_id: Uuid,
) -> StoreResult<Vec<VideoWithOwner>> {
    let videos = store.find_videos_by_owner(owner_id).await?;
    attach_owners(store, videos).await
}

/// One page of the comments on a video, newest first, owners joined
pub async fn comments_for_video(
    store: &dyn EntityStore,
    video_id: Uuid,
    request: PageRequest,
) -> StoreResult<Slice<CommentWithOwner>> {
    let comments = store
        .find_comments_by_video(video_id, request.skip(), request.limit)
        .await?;
    let owners = users_by_id(store, comments.items.iter().map(|c| c.owner_id)).await?;
    Ok(comments.map(|comment| {
        let owner = summary(owners.matches(&comment.owner_id));
        CommentWithOwner::new(comment, owner)
    }))
}

/// Video likes of a user with the video and its owner nested in
pub async fn liked_videos(store: &dyn EntityStore, user_id: Uuid) -> StoreResult<Vec<LikedVideo>> {
    let likes: Vec<_> = store
        .find_likes_by_user(user_id)
        .await?
        .into_iter()
        .filter(|like| like.target.video_id().is_some())
        .collect();

    let video_ids = distinct(likes.iter().filter_map(|like| like.target.video_id()));
    let videos = if video_ids.is_empty() {
        Vec::new()
    } else {
        store.find_videos_by_ids(&video_ids).await?
    };
    let videos = Lookup::new(attach_owners(store, videos).await?, |v| v.id);

    Ok(videos.join(
        likes,
        |like| like.target.id(),
        |like, matched| LikedVideo::new(like, collapse(matched).cloned()),
    ))
}

/// Channel page for `username`; `None` when no such user exists
pub async fn channel_profile(
    store: &dyn EntityStore,
    username: &str,
    requester: Option<Uuid>,
) -> StoreResult<Option<ChannelProfile>> {
    let username = username.trim().to_lowercase();
    let channel = match store.find_user_by_username(&username).await? {
        Some(user) => user,
        None => return Ok(None),
    };

    let subscribers = store.find_subscriptions_by_channel(channel.id).await?;
    let subscribed_to = store.find_subscriptions_by_subscriber(channel.id).await?;
    let subscriber_count = subscribers.len();
    let by_subscriber = Lookup::new(subscribers, |s| s.subscriber_id);
    let is_subscribed = requester
        .map(|id| !by_subscriber.matches(&id).is_empty())
        .unwrap_or(false);

    Ok(Some(ChannelProfile {
        id: channel.id,
        username: channel.username,
        fullname: channel.fullname,
        email: channel.email,
        avatar: channel.avatar,
        cover_image: channel.cover_image,
        subscribers_count: subscriber_count,
        channels_subscribed_to_count: subscribed_to.len(),
        is_subscribed,
        created_at: channel.created_at,
    }))
}

/// Watched videos in history order, owners joined
pub async fn watch_history(store: &dyn EntityStore, user_id: Uuid) -> StoreResult<Vec<VideoWithOwner>> {
    match store.find_user_by_id(user_id).await? {
        Some(user) => videos_in_order(store, &user.watch_history).await,
        None => Ok(Vec::new()),
    }
}

pub async fn channel_subscribers(
    store: &dyn EntityStore,
    channel_id: Uuid,
) -> StoreResult<Vec<SubscriberEntry>> {
    let subscriptions = store.find_subscriptions_by_channel(channel_id).await?;
    let users = users_by_id(store, subscriptions.iter().map(|s| s.subscriber_id)).await?;
    Ok(users.join(subscriptions, |s| s.subscriber_id, |subscription, matched| {
        SubscriberEntry::new(subscription, summary(matched))
    }))
}

pub async fn subscribed_channels(
    store: &dyn EntityStore,
    subscriber_id: Uuid,
) -> StoreResult<Vec<SubscribedChannel>> {
    let subscriptions = store.find_subscriptions_by_subscriber(subscriber_id).await?;
    let users = users_by_id(store, subscriptions.iter().map(|s| s.channel_id)).await?;
    Ok(users.join(subscriptions, |s| s.channel_id, |subscription, matched| {
        SubscribedChannel::new(subscription, summary(matched))
    }))
}

pub async fn playlist_with_videos(
    store: &dyn EntityStore,
    playlist_id: Uuid,
) -> StoreResult<Option<PlaylistWithVideos>> {
    let playlist = match store.find_playlist_by_id(playlist_id).await? {
        Some(playlist) => playlist,
        None => return Ok(None),
    };
    let videos = videos_in_order(store, &playlist.videos).await?;
    let owner = users_by_id(store, [playlist.owner_id]).await?;
    let owner = summary(owner.matches(&playlist.owner_id));
    Ok(Some(PlaylistWithVideos::new(playlist, owner, videos)))
}
