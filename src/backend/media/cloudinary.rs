/**
 * Cloudinary Client
 *
 * Signed upload to `https://api.cloudinary.com/v1_1/{cloud}/auto/upload`.
 * The signature is the hex SHA-1 of the sorted signed parameters followed by
 * the API secret; only `timestamp` is signed here.
 */

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha1::{Digest, Sha1};

use super::{MediaHost, StagedFile, UploadedMedia};
use crate::backend::server::config::CloudinaryConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
    secure_url: Option<String>,
    duration: Option<f64>,
}

/// Media host backed by a Cloudinary account
#[derive(Debug, Clone)]
pub struct CloudinaryHost {
    config: CloudinaryConfig,
    http_client: reqwest::Client,
}

/// Parameters covered by the signature, already in sorted order
fn string_to_sign(timestamp: i64) -> String {
    format!("timestamp={}", timestamp)
}

/// Hex SHA-1 of `to_sign` followed by `secret`
fn sign(to_sign: &str, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Name sent with the file part; the client name, or `upload` when it sent none
fn part_file_name(file: &StagedFile) -> String {
    match file.file_name().trim() {
        "" => "upload".to_string(),
        name => name.to_string(),
    }
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/auto/upload", API_BASE, self.config.cloud_name)
    }

    async fn try_upload(&self, file: &StagedFile) -> Result<UploadedMedia, String> {
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|e| format!("Failed to read staged file: {}", e))?;
        let file_name = part_file_name(file);

        let timestamp = Utc::now().timestamp();
        let signature = sign(&string_to_sign(timestamp), &self.config.api_secret);

        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name(file_name))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature);

        let response = self
            .http_client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("Cloudinary request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Cloudinary returned {}: {}", status, body));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Cloudinary response: {}", e))?;

        Ok(UploadedMedia {
            url: uploaded.secure_url.unwrap_or(uploaded.url),
            duration: uploaded.duration,
        })
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, file: &StagedFile) -> Option<UploadedMedia> {
        match self.try_upload(file).await {
            Ok(media) => {
                tracing::info!("Uploaded media to {}", media.url);
                Some(media)
            }
            Err(e) => {
                tracing::error!("Media upload failed: {}", e);
                None
            }
        }
    }
}
