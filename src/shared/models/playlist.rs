/**
 * Playlist Model
 *
 * An ordered, duplicate-free list of video ids owned by one user. The
 * stored `duration` is the sum of the durations of the listed videos and is
 * maintained by the add/remove operations.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{require_non_blank, SharedError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Total length in seconds
    pub duration: f64,
    pub videos: Vec<Uuid>,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Append `video_id` unless present. Returns whether it was added.
    pub fn add_video(&mut self, video_id: Uuid, duration: f64) -> bool {
        if self.videos.contains(&video_id) {
            return false;
        }
        self.videos.push(video_id);
        self.duration += duration;
        self.updated_at = Utc::now();
        true
    }

    /// Remove `video_id` if present. Returns whether it was removed.
    pub fn remove_video(&mut self, video_id: Uuid, duration: f64) -> bool {
        let before = self.videos.len();
        self.videos.retain(|id| *id != video_id);
        if self.videos.len() == before {
            return false;
        }
        self.duration = (self.duration - duration).max(0.0);
        self.updated_at = Utc::now();
        true
    }
}

#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
}

impl NewPlaylist {
    pub fn new(name: &str, description: &str, owner_id: Uuid) -> Result<Self, SharedError> {
        Ok(Self {
            name: require_non_blank("name", name)?,
            description: require_non_blank("description", description)?,
            owner_id,
        })
    }

    pub fn into_playlist(self) -> Playlist {
        let now = Utc::now();
        Playlist {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            duration: 0.0,
            videos: Vec::new(),
            owner_id: self.owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl PlaylistPatch {
    /// Blank values are ignored; at least one field must remain
    pub fn new(name: Option<&str>, description: Option<&str>) -> Result<Self, SharedError> {
        let keep = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let patch = Self {
            name: keep(name),
            description: keep(description),
        };
        if patch.name.is_none() && patch.description.is_none() {
            return Err(SharedError::validation("name", "Name or description is required"));
        }
        Ok(patch)
    }

    pub fn apply(self, playlist: &mut Playlist) {
        if let Some(name) = self.name {
            playlist.name = name;
        }
        if let Some(description) = self.description {
            playlist.description = description;
        }
        playlist.updated_at = Utc::now();
    }
}
