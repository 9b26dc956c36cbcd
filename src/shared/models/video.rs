/**
 * Video Model
 *
 * A published (or unpublished) upload. The media itself lives on the
 * external host; the record keeps its URLs, duration and a view counter.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::shared::error::{require_non_blank, SharedError};

/// Video record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// URL of the video file on the media host
    pub video_file: String,
    /// URL of the thumbnail on the media host
    pub thumbnail: String,
    /// Length in seconds as reported by the media host
    pub duration: f64,
    /// Counted once per user, on first watch
    pub views: i64,
    pub is_published: bool,
    /// Uploading user; immutable after creation
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for publishing a video
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration: f64,
    pub owner_id: Uuid,
}

impl NewVideo {
    pub fn new(
        title: &str,
        description: &str,
        video_file: String,
        thumbnail: String,
        duration: Option<f64>,
        owner_id: Uuid,
    ) -> Result<Self, SharedError> {
        Ok(Self {
            title: require_non_blank("title", title)?,
            description: require_non_blank("description", description)?,
            video_file: require_non_blank("videoFile", &video_file)?,
            thumbnail: require_non_blank("thumbnail", &thumbnail)?,
            duration: duration.unwrap_or(0.0).max(0.0),
            owner_id,
        })
    }

    /// Materialize the record. New uploads start published with zero views.
    pub fn into_video(self) -> Video {
        let now = Utc::now();
        Video {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            video_file: self.video_file,
            thumbnail: self.thumbnail,
            duration: self.duration,
            views: 0,
            is_published: true,
            owner_id: self.owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field-level update for a video. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub is_published: Option<bool>,
}

impl VideoPatch {
    /// Metadata update; blank values are ignored and at least one field
    /// must remain.
    pub fn metadata(
        title: Option<&str>,
        description: Option<&str>,
        thumbnail: Option<&str>,
    ) -> Result<Self, SharedError> {
        let keep = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let patch = Self {
            title: keep(title),
            description: keep(description),
            thumbnail: keep(thumbnail),
            is_published: None,
        };
        if patch.title.is_none() && patch.description.is_none() && patch.thumbnail.is_none() {
            return Err(SharedError::validation(
                "title",
                "One of title, description or thumbnail is required",
            ));
        }
        Ok(patch)
    }

    pub fn published(is_published: bool) -> Self {
        Self {
            is_published: Some(is_published),
            ..Self::default()
        }
    }

    /// Apply the patch in place and bump `updated_at`
    pub fn apply(self, video: &mut Video) {
        if let Some(title) = self.title {
            video.title = title;
        }
        if let Some(description) = self.description {
            video.description = description;
        }
        if let Some(thumbnail) = self.thumbnail {
            video.thumbnail = thumbnail;
        }
        if let Some(is_published) = self.is_published {
            video.is_published = is_published;
        }
        video.updated_at = Utc::now();
    }
}

/// Sortable video columns for the listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSortField {
    /// Parse the `sortBy` query value; unknown names fall back to `createdAt`
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("updatedAt") => Self::UpdatedAt,
            Some("views") => Self::Views,
            Some("duration") => Self::Duration,
            Some("title") => Self::Title,
            _ => Self::CreatedAt,
        }
    }

    /// SQL column backing this field
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Views => "views",
            Self::Duration => "duration",
            Self::Title => "title",
        }
    }

    /// Ascending comparison of two videos on this field
    pub fn compare(&self, a: &Video, b: &Video) -> Ordering {
        match self {
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            Self::Views => a.views.cmp(&b.views),
            Self::Duration => a.duration.total_cmp(&b.duration),
            Self::Title => a.title.cmp(&b.title),
        }
    }
}

/// Sort direction; `sortType=-1` is descending, anything else ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(value: Option<&str>) -> Self {
        match value.and_then(|v| v.trim().parse::<i32>().ok()) {
            Some(-1) => Self::Descending,
            _ => Self::Ascending,
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// SQL `ORDER BY` keyword
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Filter and ordering for the public video listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoListQuery {
    /// Case-insensitive substring of title or description; empty matches all
    pub text: String,
    pub sort_by: VideoSortField,
    pub direction: SortDirection,
}

impl VideoListQuery {
    /// Trimmed search text
    pub fn needle(&self) -> &str {
        self.text.trim()
    }

    pub fn matches(&self, video: &Video) -> bool {
        let needle = self.needle().to_lowercase();
        needle.is_empty()
            || video.title.to_lowercase().contains(&needle)
            || video.description.to_lowercase().contains(&needle)
    }

    pub fn compare(&self, a: &Video, b: &Video) -> Ordering {
        self.direction.apply(self.sort_by.compare(a, b))
    }
}
