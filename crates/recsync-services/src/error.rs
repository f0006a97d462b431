use std::path::PathBuf;

use recsync_storage::StorageError;

/// Errors raised during a synchronization run.
///
/// Fatal errors end the run; the rest only skip the file they concern.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Index document {location} is malformed: {source}")]
    IndexMalformed {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read index {}: {source}", path.display())]
    IndexRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Index document {location} is unavailable: {source}")]
    IndexStorage {
        location: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to serialize index: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Cannot scan watch root {}: {reason}", path.display())]
    WatchRoot { path: PathBuf, reason: String },

    #[error("Failed to persist index {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        match self {
            SyncError::IndexMalformed { .. }
            | SyncError::IndexRead { .. }
            | SyncError::IndexStorage { .. }
            | SyncError::Serialize(_)
            | SyncError::WatchRoot { .. }
            | SyncError::Persist { .. } => true,
            SyncError::Storage(_) | SyncError::Io { .. } => false,
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
