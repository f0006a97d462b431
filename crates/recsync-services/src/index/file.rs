use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use recsync_core::Index;
use tempfile::NamedTempFile;

use super::{parse_index, serialize_index, IndexStore, LoadedIndex};
use crate::error::{SyncError, SyncResult};

/// Index kept in a local JSON file.
///
/// Saves go to a temporary file in the same directory which is then renamed over the
/// destination, so readers only ever see a complete document.
#[derive(Debug, Clone)]
pub struct FileIndexStore {
    path: PathBuf,
}

impl FileIndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, body: &[u8]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(body)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[async_trait]
impl IndexStore for FileIndexStore {
    async fn load(&self) -> SyncResult<LoadedIndex> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No existing index, starting with empty list");
                return Ok(LoadedIndex::default());
            }
            Err(source) => {
                return Err(SyncError::IndexRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let index = parse_index(&data, &self.location())?;
        tracing::debug!(path = %self.path.display(), records = index.len(), "Index loaded");
        Ok(LoadedIndex {
            index,
            existed: true,
        })
    }

    async fn save(&self, index: &Index) -> SyncResult<()> {
        let body = serialize_index(index)?;
        self.write_atomic(&body).map_err(|source| SyncError::Persist {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), records = index.len(), "Index saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
