/**
 * In-process Entity Store
 *
 * Every collection lives in one `Tables` value behind a single
 * `tokio::sync::RwLock`. Each trait method takes the lock once, so
 * check-and-write sequences (uniqueness, toggles, watch-history dedup)
 * are atomic with respect to concurrent requests.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EntityStore, Slice, StoreError, StoreResult};
use crate::backend::toggle::ToggleOutcome;
use crate::shared::models::{
    Comment, Like, LikeTarget, NewComment, NewPlaylist, NewUser, NewVideo, Playlist,
    PlaylistPatch, Subscription, User, UserPatch, Video, VideoListQuery, VideoPatch,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    videos: Vec<Video>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
    subscriptions: Vec<Subscription>,
    playlists: Vec<Playlist>,
}

/// Entity store backed by in-memory vectors
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; later inserts win ties so equal timestamps stay deterministic
fn newest_first<T>(
    rows: impl DoubleEndedIterator<Item = T>,
    key: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut rows: Vec<T> = rows.rev().collect();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::conflict("user", "username"));
        }
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::conflict("user", "email"));
        }
        let user = new_user.into_user();
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &patch.email {
            if tables.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::conflict("user", "email"));
            }
        }
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|user| {
            patch.apply(user);
            user.clone()
        }))
    }

    async fn push_watch_history(&self, user_id: Uuid, video_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.users.iter_mut().find(|u| u.id == user_id) {
            Some(user) if !user.has_watched(video_id) => {
                user.watch_history.push(video_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_from_watch_history(&self, user_id: Uuid, video_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.watch_history.retain(|id| *id != video_id);
        }
        Ok(())
    }

    async fn create_video(&self, new_video: NewVideo) -> StoreResult<Video> {
        let video = new_video.into_video();
        self.tables.write().await.videos.push(video.clone());
        Ok(video)
    }

    async fn find_video_by_id(&self, id: Uuid) -> StoreResult<Option<Video>> {
        let tables = self.tables.read().await;
        Ok(tables.videos.iter().find(|v| v.id == id).cloned())
    }

    async fn find_videos_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Video>> {
        let tables = self.tables.read().await;
        Ok(tables.videos.iter().filter(|v| ids.contains(&v.id)).cloned().collect())
    }

    async fn find_videos_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Video>> {
        let tables = self.tables.read().await;
        Ok(tables.videos.iter().filter(|v| v.owner_id == owner_id).cloned().collect())
    }

    async fn search_videos(
        &self,
        query: &VideoListQuery,
        skip: usize,
        limit: usize,
    ) -> StoreResult<Slice<Video>> {
        let tables = self.tables.read().await;
        let mut videos: Vec<Video> = tables
            .videos
            .iter()
            .filter(|v| query.matches(v))
            .cloned()
            .collect();
        videos.sort_by(|a, b| query.compare(a, b));
        Ok(Slice::window(videos, skip, limit))
    }

    async fn update_video(&self, id: Uuid, patch: VideoPatch) -> StoreResult<Option<Video>> {
        let mut tables = self.tables.write().await;
        Ok(tables.videos.iter_mut().find(|v| v.id == id).map(|video| {
            patch.apply(video);
            video.clone()
        }))
    }

    async fn increment_video_views(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(video) = tables.videos.iter_mut().find(|v| v.id == id) {
            video.views += 1;
        }
        Ok(())
    }

    async fn delete_video(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.videos.len();
        tables.videos.retain(|v| v.id != id);
        Ok(tables.videos.len() != before)
    }

    async fn create_comment(&self, new_comment: NewComment) -> StoreResult<Comment> {
        let comment = new_comment.into_comment();
        self.tables.write().await.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_comment_by_id(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn find_comments_by_video(
        &self,
        video_id: Uuid,
        skip: usize,
        limit: usize,
    ) -> StoreResult<Slice<Comment>> {
        let tables = self.tables.read().await;
        let comments = newest_first(
            tables.comments.iter().filter(|c| c.video_id == video_id).cloned(),
            |c| c.created_at,
        );
        Ok(Slice::window(comments, skip, limit))
    }

    async fn update_comment(&self, id: Uuid, content: String) -> StoreResult<Option<Comment>> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.iter_mut().find(|c| c.id == id).map(|comment| {
            comment.content = content;
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        Ok(tables.comments.len() != before)
    }

    async fn toggle_like(&self, user_id: Uuid, target: LikeTarget) -> StoreResult<ToggleOutcome<Like>> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .likes
            .iter()
            .position(|l| l.liked_by == user_id && l.target == target);
        match existing {
            Some(index) => Ok(ToggleOutcome::Removed(tables.likes.remove(index))),
            None => {
                let like = Like::new(user_id, target);
                tables.likes.push(like.clone());
                Ok(ToggleOutcome::Added(like))
            }
        }
    }

    async fn find_like(&self, user_id: Uuid, target: LikeTarget) -> StoreResult<Option<Like>> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .find(|l| l.liked_by == user_id && l.target == target)
            .cloned())
    }

    async fn find_likes_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Like>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.likes.iter().filter(|l| l.liked_by == user_id).cloned(),
            |l| l.created_at,
        ))
    }

    async fn toggle_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> StoreResult<ToggleOutcome<Subscription>> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .subscriptions
            .iter()
            .position(|s| s.subscriber_id == subscriber_id && s.channel_id == channel_id);
        match existing {
            Some(index) => Ok(ToggleOutcome::Removed(tables.subscriptions.remove(index))),
            None => {
                let subscription = Subscription::new(subscriber_id, channel_id);
                tables.subscriptions.push(subscription.clone());
                Ok(ToggleOutcome::Added(subscription))
            }
        }
    }

    async fn find_subscriptions_by_channel(&self, channel_id: Uuid) -> StoreResult<Vec<Subscription>> {
        let tables = self.tables.read().await;
        Ok(tables
            .subscriptions
            .iter()
            .filter(|s| s.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn find_subscriptions_by_subscriber(
        &self,
        subscriber_id: Uuid,
    ) -> StoreResult<Vec<Subscription>> {
        let tables = self.tables.read().await;
        Ok(tables
            .subscriptions
            .iter()
            .filter(|s| s.subscriber_id == subscriber_id)
            .cloned()
            .collect())
    }

    async fn create_playlist(&self, new_playlist: NewPlaylist) -> StoreResult<Playlist> {
        let playlist = new_playlist.into_playlist();
        self.tables.write().await.playlists.push(playlist.clone());
        Ok(playlist)
    }

    async fn find_playlist_by_id(&self, id: Uuid) -> StoreResult<Option<Playlist>> {
        let tables = self.tables.read().await;
        Ok(tables.playlists.iter().find(|p| p.id == id).cloned())
    }

    async fn find_playlists_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Playlist>> {
        let tables = self.tables.read().await;
        Ok(tables
            .playlists
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_playlist(&self, id: Uuid, patch: PlaylistPatch) -> StoreResult<Option<Playlist>> {
        let mut tables = self.tables.write().await;
        Ok(tables.playlists.iter_mut().find(|p| p.id == id).map(|playlist| {
            patch.apply(playlist);
            playlist.clone()
        }))
    }

    async fn add_video_to_playlist(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
        duration: f64,
    ) -> StoreResult<Option<Playlist>> {
        let mut tables = self.tables.write().await;
        Ok(tables.playlists.iter_mut().find(|p| p.id == playlist_id).map(|playlist| {
            playlist.add_video(video_id, duration);
            playlist.clone()
        }))
    }

    async fn remove_video_from_playlist(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
        duration: f64,
    ) -> StoreResult<Option<Playlist>> {
        let mut tables = self.tables.write().await;
        Ok(tables.playlists.iter_mut().find(|p| p.id == playlist_id).map(|playlist| {
            playlist.remove_video(video_id, duration);
            playlist.clone()
        }))
    }

    async fn delete_playlist(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.playlists.len();
        tables.playlists.retain(|p| p.id != id);
        Ok(tables.playlists.len() != before)
    }
}
