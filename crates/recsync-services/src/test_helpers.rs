//! Mock Storage implementation for testing

use async_trait::async_trait;
use recsync_storage::{Storage, StorageBackend, StorageError, StorageResult};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Mock storage implementation that stores objects in memory
#[derive(Clone, Default)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    content_types: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    download_error: Arc<Mutex<Option<String>>>,
    uploads: Arc<Mutex<Vec<String>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an object in the mock storage
    pub fn set_file(&self, key: &str, data: Vec<u8>) {
        self.files.lock().unwrap().insert(key.to_string(), data);
    }

    /// Get object data (for test assertions)
    pub fn get_file(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(key).cloned()
    }

    /// Content type an object was last written with through `upload_with_key`.
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.content_types.lock().unwrap().get(key).cloned()
    }

    /// Make every upload whose key ends with `suffix` fail.
    pub fn fail_uploads_for(&self, suffix: &str) {
        self.failing.lock().unwrap().insert(suffix.to_string());
    }

    /// Make every download fail with `DownloadFailed(reason)`.
    pub fn fail_downloads(&self, reason: &str) {
        *self.download_error.lock().unwrap() = Some(reason.to_string());
    }

    fn check_upload(&self, storage_key: &str) -> StorageResult<()> {
        let fails = self
            .failing
            .lock()
            .unwrap()
            .iter()
            .any(|suffix| storage_key.ends_with(suffix.as_str()));
        if fails {
            return Err(StorageError::UploadFailed(format!(
                "injected failure for {}",
                storage_key
            )));
        }
        Ok(())
    }

    /// Keys passed to `upload_file`, in call order, including failed attempts.
    pub fn upload_calls(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload_file(&self, storage_key: &str, source: &Path) -> StorageResult<String> {
        self.uploads.lock().unwrap().push(storage_key.to_string());
        self.check_upload(storage_key)?;

        let data = std::fs::read(source)?;
        self.set_file(storage_key, data);
        Ok(self.public_url(storage_key))
    }

    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        self.check_upload(storage_key)?;
        self.set_file(storage_key, data);
        self.content_types
            .lock()
            .unwrap()
            .insert(storage_key.to_string(), content_type.to_string());
        Ok(self.public_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        if let Some(reason) = self.download_error.lock().unwrap().clone() {
            return Err(StorageError::DownloadFailed(reason));
        }
        self.get_file(storage_key)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(storage_key))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("https://example.com/{}", storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
