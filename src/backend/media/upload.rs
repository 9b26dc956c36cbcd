/**
 * Multipart Upload Staging
 *
 * `MultipartForm` is an extractor that reads a whole `multipart/form-data`
 * body: text fields are kept in memory, file fields are spooled to
 * `NamedTempFile`s in the configured upload directory.
 *
 * A file field sent without a file (empty filename and no bytes, which is
 * what browsers send for an untouched file input) counts as absent.
 *
 * Disk writes run on the blocking pool via `spawn_blocking`.
 */

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use tempfile::NamedTempFile;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// An uploaded file waiting on disk; removed when dropped
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    file_name: String,
}

impl StagedFile {
    pub fn new(file: NamedTempFile, file_name: String) -> Self {
        Self { file, file_name }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Client-supplied file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Parsed multipart body
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, StagedFile>,
}

async fn stage(temp_dir: &Path, file_name: &str, bytes: Bytes) -> Result<StagedFile, BackendError> {
    let dir = temp_dir.to_path_buf();
    let written = tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&dir)
            .and_then(|_| NamedTempFile::new_in(&dir))
            .and_then(|mut file| file.write_all(&bytes).map(|_| file))
    })
    .await;

    match written {
        Ok(Ok(file)) => Ok(StagedFile::new(file, file_name.to_string())),
        Ok(Err(e)) => {
            tracing::error!("Failed to stage upload in {}: {:?}", temp_dir.display(), e);
            Err(BackendError::internal("Failed to store uploaded file"))
        }
        Err(e) => {
            tracing::error!("Upload staging task failed: {}", e);
            Err(BackendError::internal("Failed to store uploaded file"))
        }
    }
}

impl MultipartForm {
    /// Drain `multipart`, staging file fields under `temp_dir`
    pub async fn read(mut multipart: Multipart, temp_dir: &Path) -> Result<Self, BackendError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::warn!("Multipart error: {}", e);
            BackendError::handler(e.status(), e.body_text())
        })? {
            let name = field.name().unwrap_or("").to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| BackendError::handler(e.status(), e.body_text()))?;
                    if file_name.is_empty() && data.is_empty() {
                        continue;
                    }
                    let size = data.len();
                    let staged = stage(temp_dir, &file_name, data).await?;
                    tracing::debug!("Staged {} ({} bytes) for field {}", file_name, size, name);
                    form.files.insert(name, staged);
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| BackendError::handler(e.status(), e.body_text()))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Text field value, if sent
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Take ownership of a staged file field
    pub fn take_file(&mut self, name: &str) -> Option<StagedFile> {
        self.files.remove(name)
    }
}

impl FromRequest<AppState> for MultipartForm {
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await.map_err(|e| {
            tracing::warn!("Rejected multipart request: {}", e.body_text());
            BackendError::bad_request(e.body_text())
        })?;
        Self::read(multipart, &state.config.upload_temp_dir).await
    }
}
