#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use recsync_core::AppConfig;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &AppConfig) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let storage = S3Storage::new(
                config.bucket.clone(),
                config.region.clone(),
                config.endpoint().map(String::from),
                config.credentials(),
                config.public_base_url(),
            )?;
            tracing::debug!(bucket = %config.bucket, region = %config.region, "S3 storage configured");
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            if config.local_storage_path.is_empty() {
                return Err(StorageError::ConfigError(
                    "localStoragePath not configured".to_string(),
                ));
            }
            let storage =
                LocalStorage::new(&config.local_storage_path, config.public_base_url()).await?;
            tracing::debug!(path = %config.local_storage_path, "Local storage configured");
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn creates_local_backend() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            watch_dir: "/rec".to_string(),
            bucket: "b".to_string(),
            region: "r".to_string(),
            base_url: "https://cdn.example.com".to_string(),
            storage_backend: StorageBackend::Local,
            local_storage_path: dir.path().join("mirror").to_string_lossy().into_owned(),
            ..AppConfig::default()
        };

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert_eq!(storage.public_url("k.mp4"), "https://cdn.example.com/k.mp4");
        assert!(dir.path().join("mirror").is_dir());
    }
}
