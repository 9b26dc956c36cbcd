/**
 * PostgreSQL Entity Store
 *
 * sqlx implementation of `EntityStore`. Schema lives in `migrations/`.
 *
 * # Atomic operations
 *
 * - Uniqueness is enforced by unique indexes; violations surface as
 *   `StoreError::Conflict`.
 * - Toggles are a single data-modifying CTE: delete the pair if present,
 *   otherwise insert it. The result row carries a `removed` flag.
 * - Watch history and playlist membership use guarded `array_append`
 *   so a concurrent duplicate push is a no-op.
 */

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EntityStore, Slice, StoreError, StoreResult};
use crate::backend::toggle::ToggleOutcome;
use crate::shared::models::{
    Comment, Like, LikeRow, LikeTarget, NewComment, NewPlaylist, NewUser, NewVideo, Playlist,
    PlaylistPatch, Subscription, User, UserPatch, Video, VideoListQuery, VideoPatch,
};

const USER_COLUMNS: &str = "id, username, email, fullname, avatar, cover_image, watch_history, \
                            password_hash, refresh_token, created_at, updated_at";
const VIDEO_COLUMNS: &str = "id, title, description, video_file, thumbnail, duration, views, \
                             is_published, owner_id, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, content, video_id, owner_id, created_at, updated_at";
const LIKE_COLUMNS: &str = "id, video_id, comment_id, liked_by, created_at";
const SUBSCRIPTION_COLUMNS: &str = "id, subscriber_id, channel_id, created_at";
const PLAYLIST_COLUMNS: &str =
    "id, name, description, duration, videos, owner_id, created_at, updated_at";

/// Row shape returned by the toggle CTEs
#[derive(sqlx::FromRow)]
struct ToggledLike {
    #[sqlx(flatten)]
    like: LikeRow,
    removed: bool,
}

#[derive(sqlx::FromRow)]
struct ToggledSubscription {
    #[sqlx(flatten)]
    subscription: Subscription,
    removed: bool,
}

/// Entity store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url` and apply pending migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!("Database connection pool created successfully");

        tracing::info!("Running database migrations...");
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        tracing::info!("Database migrations completed successfully");

        Ok(Self::new(pool))
    }
}

/// Map unique-index violations onto `StoreError::Conflict`
fn conflict_or(entity: &'static str, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            let detail = db_err.constraint().unwrap_or("unique").to_string();
            tracing::warn!("Unique violation on {}: {}", entity, detail);
            StoreError::conflict(entity, detail)
        }
        _ => StoreError::Database(err),
    }
}

/// `LIMIT` / `OFFSET` bind value, clamped to the BIGINT range
fn sql_bound(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn row_count(count: i64) -> usize {
    usize::try_from(count).unwrap_or_default()
}

/// Escape `%`, `_` and `\` so the query is matched literally by ILIKE
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn into_like(row: LikeRow) -> StoreResult<Like> {
    Like::try_from(row).map_err(StoreError::Corrupt)
}

#[async_trait]
impl EntityStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let user = new_user.into_user();
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, email, fullname, avatar, cover_image, watch_history,
                               password_hash, refresh_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.fullname)
        .bind(&user.avatar)
        .bind(&user.cover_image)
        .bind(&user.watch_history)
        .bind(&user.password_hash)
        .bind(&user.refresh_token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or("user", e))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $2 LIMIT 1"
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<User>> {
        let (set_refresh, refresh_token) = match patch.refresh_token {
            Some(token) => (true, token),
            None => (false, None),
        };
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                fullname = COALESCE($2, fullname),
                email = COALESCE($3, email),
                avatar = COALESCE($4, avatar),
                cover_image = COALESCE($5, cover_image),
                password_hash = COALESCE($6, password_hash),
                refresh_token = CASE WHEN $7 THEN $8 ELSE refresh_token END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.fullname)
        .bind(patch.email)
        .bind(patch.avatar)
        .bind(patch.cover_image)
        .bind(patch.password_hash)
        .bind(set_refresh)
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or("user", e))
    }

    async fn push_watch_history(&self, user_id: Uuid, video_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET watch_history = array_append(watch_history, $2)
            WHERE id = $1 AND NOT ($2 = ANY(watch_history))
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn remove_from_watch_history(&self, user_id: Uuid, video_id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE users SET watch_history = array_remove(watch_history, $2) WHERE id = $1")
            .bind(user_id)
            .bind(video_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_video(&self, new_video: NewVideo) -> StoreResult<Video> {
        let video = new_video.into_video();
        Ok(sqlx::query_as::<_, Video>(&format!(
            r#"
            INSERT INTO videos (id, title, description, video_file, thumbnail, duration, views,
                                is_published, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_file)
        .bind(&video.thumbnail)
        .bind(video.duration)
        .bind(video.views)
        .bind(video.is_published)
        .bind(video.owner_id)
        .bind(video.created_at)
        .bind(video.updated_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_video_by_id(&self, id: Uuid) -> StoreResult<Option<Video>> {
        Ok(sqlx::query_as::<_, Video>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_videos_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Video>> {
        Ok(sqlx::query_as::<_, Video>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_videos_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Video>> {
        Ok(sqlx::query_as::<_, Video>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE owner_id = $1 ORDER BY created_at"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn search_videos(
        &self,
        query: &VideoListQuery,
        skip: usize,
        limit: usize,
    ) -> StoreResult<Slice<Video>> {
        const FILTER: &str = "$1 = '' OR title ILIKE $2 OR description ILIKE $2";
        let needle = query.needle();

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM videos WHERE {FILTER}"
        ))
        .bind(needle)
        .bind(like_pattern(needle))
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, Video>(&format!(
            r#"
            SELECT {VIDEO_COLUMNS} FROM videos
            WHERE {FILTER}
            ORDER BY {column} {direction}, id {direction}
            LIMIT $3 OFFSET $4
            "#,
            column = query.sort_by.column(),
            direction = query.direction.keyword(),
        ))
        .bind(needle)
        .bind(like_pattern(needle))
        .bind(sql_bound(limit))
        .bind(sql_bound(skip))
        .fetch_all(&self.pool)
        .await?;

        Ok(Slice {
            items,
            total: row_count(total),
        })
    }

    async fn update_video(&self, id: Uuid, patch: VideoPatch) -> StoreResult<Option<Video>> {
        Ok(sqlx::query_as::<_, Video>(&format!(
            r#"
            UPDATE videos SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                thumbnail = COALESCE($4, thumbnail),
                is_published = COALESCE($5, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.thumbnail)
        .bind(patch.is_published)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn increment_video_views(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_video(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_comment(&self, new_comment: NewComment) -> StoreResult<Comment> {
        let comment = new_comment.into_comment();
        Ok(sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (id, content, video_id, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(comment.id)
        .bind(&comment.content)
        .bind(comment.video_id)
        .bind(comment.owner_id)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_comment_by_id(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_comments_by_video(
        &self,
        video_id: Uuid,
        skip: usize,
        limit: usize,
    ) -> StoreResult<Slice<Comment>> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE video_id = $1")
                .bind(video_id)
                .fetch_one(&self.pool)
                .await?;

        let items = sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS} FROM comments
            WHERE video_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(video_id)
        .bind(sql_bound(limit))
        .bind(sql_bound(skip))
        .fetch_all(&self.pool)
        .await?;

        Ok(Slice {
            items,
            total: row_count(total),
        })
    }

    async fn update_comment(&self, id: Uuid, content: String) -> StoreResult<Option<Comment>> {
        Ok(sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_like(&self, user_id: Uuid, target: LikeTarget) -> StoreResult<ToggleOutcome<Like>> {
        let column = target.column();
        let row = sqlx::query_as::<_, ToggledLike>(&format!(
            r#"
            WITH removed AS (
                DELETE FROM likes WHERE liked_by = $2 AND {column} = $5
                RETURNING {LIKE_COLUMNS}
            ), inserted AS (
                INSERT INTO likes (id, video_id, comment_id, liked_by, created_at)
                SELECT $1, $3, $4, $2, NOW()
                WHERE NOT EXISTS (SELECT 1 FROM removed)
                ON CONFLICT DO NOTHING
                RETURNING {LIKE_COLUMNS}
            )
            SELECT {LIKE_COLUMNS}, TRUE AS removed FROM removed
            UNION ALL
            SELECT {LIKE_COLUMNS}, FALSE AS removed FROM inserted
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(target.video_id())
        .bind(target.comment_id())
        .bind(target.id())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ToggledLike { like, removed: true }) => Ok(ToggleOutcome::Removed(into_like(like)?)),
            Some(ToggledLike { like, removed: false }) => Ok(ToggleOutcome::Added(into_like(like)?)),
            // A concurrent toggle inserted the pair first; it is now present
            None => match self.find_like(user_id, target).await? {
                Some(like) => Ok(ToggleOutcome::Added(like)),
                None => Err(StoreError::Corrupt(format!(
                    "like toggle for {} on {:?} produced no row",
                    user_id, target
                ))),
            },
        }
    }

    async fn find_like(&self, user_id: Uuid, target: LikeTarget) -> StoreResult<Option<Like>> {
        let column = target.column();
        let row = sqlx::query_as::<_, LikeRow>(&format!(
            "SELECT {LIKE_COLUMNS} FROM likes WHERE liked_by = $1 AND {column} = $2"
        ))
        .bind(user_id)
        .bind(target.id())
        .fetch_optional(&self.pool)
        .await?;
        row.map(into_like).transpose()
    }

    async fn find_likes_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Like>> {
        let rows = sqlx::query_as::<_, LikeRow>(&format!(
            "SELECT {LIKE_COLUMNS} FROM likes WHERE liked_by = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(into_like).collect()
    }

    async fn toggle_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> StoreResult<ToggleOutcome<Subscription>> {
        let row = sqlx::query_as::<_, ToggledSubscription>(&format!(
            r#"
            WITH removed AS (
                DELETE FROM subscriptions WHERE subscriber_id = $2 AND channel_id = $3
                RETURNING {SUBSCRIPTION_COLUMNS}
            ), inserted AS (
                INSERT INTO subscriptions (id, subscriber_id, channel_id, created_at)
                SELECT $1, $2, $3, NOW()
                WHERE NOT EXISTS (SELECT 1 FROM removed)
                ON CONFLICT DO NOTHING
                RETURNING {SUBSCRIPTION_COLUMNS}
            )
            SELECT {SUBSCRIPTION_COLUMNS}, TRUE AS removed FROM removed
            UNION ALL
            SELECT {SUBSCRIPTION_COLUMNS}, FALSE AS removed FROM inserted
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(subscriber_id)
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ToggledSubscription { subscription, removed: true }) => {
                Ok(ToggleOutcome::Removed(subscription))
            }
            Some(ToggledSubscription { subscription, removed: false }) => {
                Ok(ToggleOutcome::Added(subscription))
            }
            None => {
                let existing = sqlx::query_as::<_, Subscription>(&format!(
                    "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
                     WHERE subscriber_id = $1 AND channel_id = $2"
                ))
                .bind(subscriber_id)
                .bind(channel_id)
                .fetch_optional(&self.pool)
                .await?;
                existing.map(ToggleOutcome::Added).ok_or_else(|| {
                    StoreError::Corrupt(format!(
                        "subscription toggle {} -> {} produced no row",
                        subscriber_id, channel_id
                    ))
                })
            }
        }
    }

    async fn find_subscriptions_by_channel(&self, channel_id: Uuid) -> StoreResult<Vec<Subscription>> {
        Ok(sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE channel_id = $1 ORDER BY created_at"
        ))
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_subscriptions_by_subscriber(
        &self,
        subscriber_id: Uuid,
    ) -> StoreResult<Vec<Subscription>> {
        Ok(sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE subscriber_id = $1 ORDER BY created_at"
        ))
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_playlist(&self, new_playlist: NewPlaylist) -> StoreResult<Playlist> {
        let playlist = new_playlist.into_playlist();
        Ok(sqlx::query_as::<_, Playlist>(&format!(
            r#"
            INSERT INTO playlists (id, name, description, duration, videos, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PLAYLIST_COLUMNS}
            "#
        ))
        .bind(playlist.id)
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.duration)
        .bind(&playlist.videos)
        .bind(playlist.owner_id)
        .bind(playlist.created_at)
        .bind(playlist.updated_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_playlist_by_id(&self, id: Uuid) -> StoreResult<Option<Playlist>> {
        Ok(sqlx::query_as::<_, Playlist>(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_playlists_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Playlist>> {
        Ok(sqlx::query_as::<_, Playlist>(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE owner_id = $1 ORDER BY created_at"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_playlist(&self, id: Uuid, patch: PlaylistPatch) -> StoreResult<Option<Playlist>> {
        Ok(sqlx::query_as::<_, Playlist>(&format!(
            r#"
            UPDATE playlists SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PLAYLIST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn add_video_to_playlist(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
        duration: f64,
    ) -> StoreResult<Option<Playlist>> {
        let updated = sqlx::query_as::<_, Playlist>(&format!(
            r#"
            UPDATE playlists SET
                videos = array_append(videos, $2),
                duration = duration + $3,
                updated_at = NOW()
            WHERE id = $1 AND NOT ($2 = ANY(videos))
            RETURNING {PLAYLIST_COLUMNS}
            "#
        ))
        .bind(playlist_id)
        .bind(video_id)
        .bind(duration)
        .fetch_optional(&self.pool)
        .await?;
        match updated {
            Some(playlist) => Ok(Some(playlist)),
            None => self.find_playlist_by_id(playlist_id).await,
        }
    }

    async fn remove_video_from_playlist(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
        duration: f64,
    ) -> StoreResult<Option<Playlist>> {
        let updated = sqlx::query_as::<_, Playlist>(&format!(
            r#"
            UPDATE playlists SET
                videos = array_remove(videos, $2),
                duration = GREATEST(duration - $3, 0),
                updated_at = NOW()
            WHERE id = $1 AND $2 = ANY(videos)
            RETURNING {PLAYLIST_COLUMNS}
            "#
        ))
        .bind(playlist_id)
        .bind(video_id)
        .bind(duration)
        .fetch_optional(&self.pool)
        .await?;
        match updated {
            Some(playlist) => Ok(Some(playlist)),
            None => self.find_playlist_by_id(playlist_id).await,
        }
    }

    async fn delete_playlist(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
