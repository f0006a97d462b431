use std::sync::Arc;

use async_trait::async_trait;
use recsync_core::constants::INDEX_CONTENT_TYPE;
use recsync_core::Index;
use recsync_storage::{Storage, StorageError};

use super::{parse_index, serialize_index, IndexStore, LoadedIndex};
use crate::error::{SyncError, SyncResult};

/// Index kept as a single object next to the recordings.
///
/// A save is one overwrite of the object.
#[derive(Clone)]
pub struct RemoteIndexStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl RemoteIndexStore {
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

#[async_trait]
impl IndexStore for RemoteIndexStore {
    async fn load(&self) -> SyncResult<LoadedIndex> {
        let data = match self.storage.download(&self.key).await {
            Ok(data) => data,
            Err(StorageError::NotFound(_)) => {
                tracing::info!(key = %self.key, "No existing index, starting with empty list");
                return Ok(LoadedIndex::default());
            }
            Err(source) => {
                return Err(SyncError::IndexStorage {
                    location: self.key.clone(),
                    source,
                })
            }
        };

        let index = parse_index(&data, &self.key)?;
        tracing::debug!(key = %self.key, records = index.len(), "Index loaded");
        Ok(LoadedIndex {
            index,
            existed: true,
        })
    }

    async fn save(&self, index: &Index) -> SyncResult<()> {
        let body = serialize_index(index)?;
        self.storage
            .upload_with_key(&self.key, body, INDEX_CONTENT_TYPE)
            .await
            .map_err(|source| SyncError::IndexStorage {
                location: self.key.clone(),
                source,
            })?;
        tracing::info!(key = %self.key, records = index.len(), "Index saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.storage.public_url(&self.key)
    }
}
