/**
 * Like Model
 *
 * A like links one user to exactly one target. The target is an enum, so a
 * record with both (or neither) of a video and a comment cannot be built.
 * The database row keeps two nullable columns guarded by a CHECK
 * constraint; `LikeRow` is that shape.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a like points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LikeTarget {
    Video(Uuid),
    Comment(Uuid),
}

impl LikeTarget {
    /// Column holding this kind of target in the `likes` table
    pub fn column(&self) -> &'static str {
        match self {
            Self::Video(_) => "video_id",
            Self::Comment(_) => "comment_id",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Video(id) | Self::Comment(id) => *id,
        }
    }

    pub fn video_id(&self) -> Option<Uuid> {
        match self {
            Self::Video(id) => Some(*id),
            Self::Comment(_) => None,
        }
    }

    pub fn comment_id(&self) -> Option<Uuid> {
        match self {
            Self::Comment(id) => Some(*id),
            Self::Video(_) => None,
        }
    }
}

/// Like record. Serializes as `{ id, video | comment, likedBy, createdAt }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: Uuid,
    #[serde(flatten)]
    pub target: LikeTarget,
    pub liked_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(liked_by: Uuid, target: LikeTarget) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            liked_by,
            created_at: Utc::now(),
        }
    }
}

/// Row shape of the `likes` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LikeRow {
    pub id: Uuid,
    pub video_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub liked_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LikeRow> for Like {
    type Error = String;

    fn try_from(row: LikeRow) -> Result<Self, Self::Error> {
        let target = match (row.video_id, row.comment_id) {
            (Some(video), None) => LikeTarget::Video(video),
            (None, Some(comment)) => LikeTarget::Comment(comment),
            _ => return Err(format!("like {} must reference exactly one target", row.id)),
        };
        Ok(Like {
            id: row.id,
            target,
            liked_by: row.liked_by,
            created_at: row.created_at,
        })
    }
}
