use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use recsync_core::Recording;
use recsync_storage::{build_object_key, Storage};

use crate::error::{SyncError, SyncResult};

/// A successfully stored recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    pub path: PathBuf,
    pub key: String,
    pub link: String,
}

/// Sends recordings to object storage under their derived keys.
#[derive(Clone)]
pub struct Uploader {
    storage: Arc<dyn Storage>,
    key_prefix: String,
}

impl Uploader {
    pub fn new(storage: Arc<dyn Storage>, key_prefix: impl Into<String>) -> Self {
        Self {
            storage,
            key_prefix: key_prefix.into(),
        }
    }

    /// Upload one file. The error is meant to be logged by the caller; the file stays
    /// out of the index and is picked up again by the next run.
    pub async fn upload(&self, path: &Path) -> SyncResult<Uploaded> {
        let modified = modified_utc(path)?;
        let key = build_object_key(&self.key_prefix, path, modified);

        tracing::info!(path = %path.display(), key = %key, "Uploading recording");
        let link = self.storage.upload_file(&key, path).await?;

        Ok(Uploaded {
            path: path.to_path_buf(),
            key,
            link,
        })
    }

    /// Build the index record for an uploaded file from its current modification time.
    pub fn recording_for(&self, uploaded: &Uploaded, topic_prefix: &str) -> SyncResult<Recording> {
        let modified = modified_utc(&uploaded.path)?;
        let file_name = uploaded
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Recording::new(
            &file_name,
            topic_prefix,
            modified,
            uploaded.link.clone(),
        ))
    }
}

fn modified_utc(path: &Path) -> SyncResult<DateTime<Utc>> {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| SyncError::io(path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}
