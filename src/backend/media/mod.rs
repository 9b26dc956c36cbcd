//! Media Host
//!
//! Uploaded files are relayed to an external media host, which returns a
//! public URL (and, for videos, a duration).
//!
//! # Module Structure
//!
//! ```text
//! media/
//! ├── mod.rs        - MediaHost trait, DisabledMediaHost
//! ├── cloudinary.rs - Cloudinary signed upload client
//! └── upload.rs     - Multipart parsing and temp-file staging
//! ```
//!
//! # Temp files
//!
//! Multipart file fields are spooled to `NamedTempFile`s under the configured
//! upload directory. The staged file is consumed by the upload and removed
//! when dropped, whether the upload succeeded or not.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;

pub mod cloudinary;
pub mod upload;

pub use cloudinary::CloudinaryHost;
pub use upload::{MultipartForm, StagedFile};

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedMedia {
    pub url: String,
    /// Seconds; only reported for audio and video
    pub duration: Option<f64>,
}

/// External store for uploaded media
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload a staged file under its client-supplied name.
    /// `None` means the upload failed; the cause is logged.
    async fn upload(&self, file: &StagedFile) -> Option<UploadedMedia>;
}

/// Media host used when no credentials are configured; every upload fails
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMediaHost;

#[async_trait]
impl MediaHost for DisabledMediaHost {
    async fn upload(&self, file: &StagedFile) -> Option<UploadedMedia> {
        tracing::warn!("Media host not configured; rejecting upload of {}", file.file_name());
        None
    }
}

/// Upload a staged file and remove it from disk
pub async fn upload_staged(media: &dyn MediaHost, staged: StagedFile) -> Option<UploadedMedia> {
    let uploaded = media.upload(&staged).await;
    drop(staged);
    uploaded
}

/// Upload a file field the request cannot do without.
///
/// # Errors
///
/// * `400 Bad Request` - `missing` when the field was not sent, `failed`
///   when the media host rejected the upload
pub async fn upload_required(
    media: &dyn MediaHost,
    staged: Option<StagedFile>,
    missing: &str,
    failed: &str,
) -> Result<UploadedMedia, BackendError> {
    let staged = staged.ok_or_else(|| BackendError::bad_request(missing))?;
    upload_staged(media, staged)
        .await
        .ok_or_else(|| BackendError::bad_request(failed))
}
