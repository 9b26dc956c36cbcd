//! Entity Store
//!
//! The persistence seam. Handlers and aggregator recipes only ever talk to
//! `dyn EntityStore`; two implementations sit behind it:
//!
//! - **`postgres`** - `PgStore`, sqlx over PostgreSQL (production)
//! - **`memory`** - `MemoryStore`, collections behind one `RwLock` (tests,
//!   and servers started without `DATABASE_URL`)
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs      - EntityStore trait, StoreError
//! ├── postgres.rs - PostgreSQL implementation
//! └── memory.rs   - In-process implementation
//! ```
//!
//! # Atomicity
//!
//! Uniqueness (username, email, like pairs, subscription pairs) and the
//! presence flips behind toggles are enforced inside a single store call:
//! unique indexes and data-modifying CTEs on PostgreSQL, one write-lock
//! critical section in memory. Callers never check-then-act across two
//! calls to get these guarantees.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::toggle::ToggleOutcome;
use crate::shared::models::{
    Comment, Like, LikeTarget, NewComment, NewPlaylist, NewUser, NewVideo, Playlist,
    PlaylistPatch, Subscription, User, UserPatch, Video, VideoListQuery, VideoPatch,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("{entity} already exists: {detail}")]
    Conflict {
        entity: &'static str,
        detail: String,
    },

    /// A stored row violates an invariant the types rely on
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn conflict(entity: &'static str, detail: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            detail: detail.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One window of an ordered listing plus the number of rows matching overall
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Slice<T> {
    /// Cut `skip..skip + limit` out of a fully ordered listing
    pub fn window(rows: Vec<T>, skip: usize, limit: usize) -> Self {
        let total = rows.len();
        Self {
            items: rows.into_iter().skip(skip).take(limit).collect(),
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Slice<U> {
        Slice {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Typed CRUD and bulk reads over every collection
#[async_trait]
pub trait EntityStore: Send + Sync {
    // ---- users ----

    /// Insert a user; `Conflict` when the username or email is taken
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    /// First user whose username OR email matches
    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>>;
    /// Users whose id is in `ids`, in no particular order
    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;
    /// `Conflict` when the patch moves the email onto another user's
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<User>>;
    /// Append to the watch history unless already present.
    /// Returns `true` only when the video was newly added.
    async fn push_watch_history(&self, user_id: Uuid, video_id: Uuid) -> StoreResult<bool>;
    async fn remove_from_watch_history(&self, user_id: Uuid, video_id: Uuid) -> StoreResult<()>;

    // ---- videos ----

    async fn create_video(&self, new_video: NewVideo) -> StoreResult<Video>;
    async fn find_video_by_id(&self, id: Uuid) -> StoreResult<Option<Video>>;
    async fn find_videos_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Video>>;
    async fn find_videos_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Video>>;
    /// Filtered, ordered window of the video listing.
    /// An empty search text matches every video.
    async fn search_videos(
        &self,
        query: &VideoListQuery,
        skip: usize,
        limit: usize,
    ) -> StoreResult<Slice<Video>>;
    async fn update_video(&self, id: Uuid, patch: VideoPatch) -> StoreResult<Option<Video>>;
    async fn increment_video_views(&self, id: Uuid) -> StoreResult<()>;
    async fn delete_video(&self, id: Uuid) -> StoreResult<bool>;

    // ---- comments ----

    async fn create_comment(&self, new_comment: NewComment) -> StoreResult<Comment>;
    async fn find_comment_by_id(&self, id: Uuid) -> StoreResult<Option<Comment>>;
    /// Window of the comments on a video, newest first
    async fn find_comments_by_video(
        &self,
        video_id: Uuid,
        skip: usize,
        limit: usize,
    ) -> StoreResult<Slice<Comment>>;
    async fn update_comment(&self, id: Uuid, content: String) -> StoreResult<Option<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool>;

    // ---- likes ----

    /// Flip presence of the (user, target) like in one atomic step
    async fn toggle_like(&self, user_id: Uuid, target: LikeTarget) -> StoreResult<ToggleOutcome<Like>>;
    async fn find_like(&self, user_id: Uuid, target: LikeTarget) -> StoreResult<Option<Like>>;
    /// Likes given by a user, newest first
    async fn find_likes_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Like>>;

    // ---- subscriptions ----

    /// Flip presence of the (subscriber, channel) pair in one atomic step
    async fn toggle_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> StoreResult<ToggleOutcome<Subscription>>;
    async fn find_subscriptions_by_channel(&self, channel_id: Uuid) -> StoreResult<Vec<Subscription>>;
    async fn find_subscriptions_by_subscriber(
        &self,
        subscriber_id: Uuid,
    ) -> StoreResult<Vec<Subscription>>;

    // ---- playlists ----

    async fn create_playlist(&self, new_playlist: NewPlaylist) -> StoreResult<Playlist>;
    async fn find_playlist_by_id(&self, id: Uuid) -> StoreResult<Option<Playlist>>;
    async fn find_playlists_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Playlist>>;
    async fn update_playlist(&self, id: Uuid, patch: PlaylistPatch) -> StoreResult<Option<Playlist>>;
    /// Append a video unless present, adding `duration` to the total
    async fn add_video_to_playlist(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
        duration: f64,
    ) -> StoreResult<Option<Playlist>>;
    /// Remove a video if present, subtracting `duration` from the total
    async fn remove_video_from_playlist(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
        duration: f64,
    ) -> StoreResult<Option<Playlist>>;
    async fn delete_playlist(&self, id: Uuid) -> StoreResult<bool>;
}
