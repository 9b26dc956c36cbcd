/**
 * User Model
 *
 * A registered account. The same record doubles as a "channel": videos,
 * subscriptions and playlists all point back to a user id.
 *
 * # Secrets
 *
 * `password_hash` and `refresh_token` are persisted but never serialized,
 * so no response projection can leak them.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{require_non_blank, SharedError};

/// User record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: Uuid,
    /// Username (unique, lowercase)
    pub username: String,
    /// Email address (unique, lowercase)
    pub email: String,
    /// Display name
    pub fullname: String,
    /// Avatar URL on the media host
    pub avatar: String,
    /// Cover image URL, empty when none was uploaded
    pub cover_image: String,
    /// Videos watched, oldest first, without duplicates
    pub watch_history: Vec<Uuid>,
    /// bcrypt hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Refresh token currently accepted for this user
    #[serde(skip_serializing, default)]
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether `video_id` is already in the watch history
    pub fn has_watched(&self, video_id: Uuid) -> bool {
        self.watch_history.contains(&video_id)
    }
}

/// Validated input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password_hash: String,
    pub avatar: String,
    pub cover_image: String,
}

impl NewUser {
    /// Validate and normalize registration fields.
    ///
    /// Username and email are trimmed and lowercased. The password must
    /// already be hashed.
    pub fn new(
        fullname: &str,
        email: &str,
        username: &str,
        password_hash: String,
        avatar: String,
        cover_image: Option<String>,
    ) -> Result<Self, SharedError> {
        let fullname = require_non_blank("fullname", fullname)?;
        let email = normalize_email(email)?;
        let username = require_non_blank("username", username)?.to_lowercase();
        let avatar = require_non_blank("avatar", &avatar)?;

        Ok(Self {
            username,
            email,
            fullname,
            password_hash,
            avatar,
            cover_image: cover_image.unwrap_or_default(),
        })
    }

    /// Materialize the record with a fresh id and timestamps
    pub fn into_user(self) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: self.username,
            email: self.email,
            fullname: self.fullname,
            avatar: self.avatar,
            cover_image: self.cover_image,
            watch_history: Vec::new(),
            password_hash: self.password_hash,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trim, lowercase and sanity-check an email address
pub fn normalize_email(email: &str) -> Result<String, SharedError> {
    let email = require_non_blank("email", email)?.to_lowercase();
    if !email.contains('@') {
        return Err(SharedError::validation("email", "Invalid email format"));
    }
    Ok(email)
}

/// Field-level update for a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub password_hash: Option<String>,
    /// `Some(None)` clears the stored refresh token
    pub refresh_token: Option<Option<String>>,
}

impl UserPatch {
    /// Account details update; both fields are required
    pub fn account(fullname: &str, email: &str) -> Result<Self, SharedError> {
        Ok(Self {
            fullname: Some(require_non_blank("fullname", fullname)?),
            email: Some(normalize_email(email)?),
            ..Self::default()
        })
    }

    pub fn avatar(url: impl Into<String>) -> Self {
        Self {
            avatar: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn cover_image(url: impl Into<String>) -> Self {
        Self {
            cover_image: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn password_hash(hash: impl Into<String>) -> Self {
        Self {
            password_hash: Some(hash.into()),
            ..Self::default()
        }
    }

    pub fn refresh_token(token: Option<String>) -> Self {
        Self {
            refresh_token: Some(token),
            ..Self::default()
        }
    }

    /// Apply the patch in place and bump `updated_at`
    pub fn apply(self, user: &mut User) {
        if let Some(fullname) = self.fullname {
            user.fullname = fullname;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
        if let Some(cover_image) = self.cover_image {
            user.cover_image = cover_image;
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(refresh_token) = self.refresh_token {
            user.refresh_token = refresh_token;
        }
        user.updated_at = Utc::now();
    }
}
