use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use recsync_core::Credentials;
use std::path::Path;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    base_url: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `credentials` - Explicit credentials; when `None` the standard AWS
    ///   environment variables and instance metadata are used
    /// * `base_url` - Public URL prefix objects are published under
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        credentials: Option<Credentials>,
        base_url: String,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(creds) = credentials {
            builder = builder
                .with_access_key_id(creds.access_key_id)
                .with_secret_access_key(creds.secret_access_key);
            if let Some(token) = creds.session_token {
                builder = builder.with_token(token);
            }
        }

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn put(
        &self,
        storage_key: &str,
        bytes: Bytes,
        content_type: Option<&str>,
        op: &str,
    ) -> StorageResult<String> {
        let size = bytes.len() as u64;
        let location = ObjectPath::from(storage_key);
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        if let Some(content_type) = content_type {
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
        }
        let opts = PutOptions {
            attributes,
            ..PutOptions::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(bytes), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 {} failed",
                op
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 {} successful",
            op
        );

        Ok(self.public_url(storage_key))
    }
}

#[async_trait]
impl Storage for S3Storage {
    /// Reads the whole recording into memory and sends it as a single PUT, with no
    /// multipart upload or resume. S3 rejects single PUTs above 5 GB, and peak memory
    /// use is the size of the file.
    async fn upload_file(&self, storage_key: &str, source: &Path) -> StorageResult<String> {
        let data = tokio::fs::read(source).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to read {}: {}", source.display(), e))
        })?;

        self.put(storage_key, Bytes::from(data), None, "upload").await
    }

    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        self.put(
            storage_key,
            Bytes::from(data),
            Some(content_type),
            "upload_with_key",
        )
        .await
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let start = std::time::Instant::now();
        let location = ObjectPath::from(storage_key);

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes.to_vec())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let location = ObjectPath::from(storage_key);
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url, storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(base_url: &str) -> S3Storage {
        S3Storage::new(
            "recordings".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000".to_string()),
            Some(Credentials {
                access_key_id: "minioadmin".to_string(),
                secret_access_key: "minioadmin".to_string(),
                session_token: None,
            }),
            base_url.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn public_url_joins_base_and_key() {
        let s3 = storage("https://recordings.s3.us-east-1.amazonaws.com/");
        assert_eq!(
            s3.public_url("level1/2024-05-01/a.mp4"),
            "https://recordings.s3.us-east-1.amazonaws.com/level1/2024-05-01/a.mp4"
        );
        assert_eq!(s3.backend_type(), StorageBackend::S3);
    }
}
