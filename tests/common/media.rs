//! Fake media host
//!
//! Accepts every upload and hands back a predictable URL, so tests can
//! publish videos and register users without network access.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use vidtube::backend::media::{MediaHost, StagedFile, UploadedMedia};

/// Duration reported for every upload
pub const FAKE_DURATION: f64 = 42.5;

/// Media host that records uploads instead of sending them anywhere
#[derive(Debug, Default)]
pub struct FakeMediaHost {
    uploads: AtomicUsize,
    fail: bool,
}

impl FakeMediaHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose uploads always fail
    pub fn failing() -> Self {
        Self {
            uploads: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, file: &StagedFile) -> Option<UploadedMedia> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail || !file.path().exists() {
            return None;
        }
        Some(UploadedMedia {
            url: format!("https://media.test/{}/{}", n, file.file_name()),
            duration: Some(FAKE_DURATION),
        })
    }
}
