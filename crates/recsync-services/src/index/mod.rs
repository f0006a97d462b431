//! Persistence of the recordings index.
//!
//! Both backends follow the same protocol: a missing (or zero-length) document loads
//! as an empty index, a malformed one fails the run, and a save replaces the whole
//! document. Neither backend guards against concurrent writers.

mod file;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use recsync_core::{AppConfig, Index, IndexLocation, Recording};
use recsync_storage::Storage;

use crate::error::{SyncError, SyncResult};

pub use file::FileIndexStore;
pub use remote::RemoteIndexStore;

/// An index as read at the start of a run.
#[derive(Debug, Clone, Default)]
pub struct LoadedIndex {
    pub index: Index,
    /// Whether a document existed at all.
    pub existed: bool,
}

#[async_trait]
pub trait IndexStore: Send + Sync {
    async fn load(&self) -> SyncResult<LoadedIndex>;

    /// Replace the stored document with `index`.
    async fn save(&self, index: &Index) -> SyncResult<()>;

    /// Human-readable location for log lines.
    fn location(&self) -> String;
}

/// Build the index store selected by `jsonPath` / `indexKey`.
pub fn create_index_store(config: &AppConfig, storage: Arc<dyn Storage>) -> Box<dyn IndexStore> {
    match config.index_location() {
        IndexLocation::File(path) => Box::new(FileIndexStore::new(path)),
        IndexLocation::Remote(key) => Box::new(RemoteIndexStore::new(storage, key)),
    }
}

pub(crate) fn parse_index(data: &[u8], location: &str) -> SyncResult<Index> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Index::new());
    }
    let records: Vec<Recording> =
        serde_json::from_slice(data).map_err(|source| SyncError::IndexMalformed {
            location: location.to_string(),
            source,
        })?;
    Ok(Index::from_records(records))
}

/// Two-space indented JSON with a trailing newline.
pub(crate) fn serialize_index(index: &Index) -> SyncResult<Vec<u8>> {
    let mut body = serde_json::to_vec_pretty(index).map_err(SyncError::Serialize)?;
    body.push(b'\n');
    Ok(body)
}
