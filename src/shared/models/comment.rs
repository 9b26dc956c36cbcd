//! Comment Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{require_non_blank, SharedError};

/// Comment on a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    /// Non-empty after trimming
    pub content: String,
    #[serde(rename = "video")]
    pub video_id: Uuid,
    /// Author; the only user allowed to edit or delete
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Validated input for posting a comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub video_id: Uuid,
    pub owner_id: Uuid,
}

impl NewComment {
    pub fn new(content: &str, video_id: Uuid, owner_id: Uuid) -> Result<Self, SharedError> {
        Ok(Self {
            content: require_non_blank("content", content)?,
            video_id,
            owner_id,
        })
    }

    pub fn into_comment(self) -> Comment {
        let now = Utc::now();
        Comment {
            id: Uuid::new_v4(),
            content: self.content,
            video_id: self.video_id,
            owner_id: self.owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}
