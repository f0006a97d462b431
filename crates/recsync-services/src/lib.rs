//! Recsync Services
//!
//! The pieces of one synchronization run: the stability filter and directory
//! scanner that find finished recordings, the uploader, the index store with its
//! local-file and remote-object backends, and the orchestrator tying them together.

pub mod error;
pub mod index;
pub mod scanner;
pub mod sync;
pub mod uploader;

#[cfg(test)]
mod test_helpers;

pub use error::{SyncError, SyncResult};
pub use index::{create_index_store, FileIndexStore, IndexStore, LoadedIndex, RemoteIndexStore};
pub use scanner::{Candidate, DirectoryScanner, StabilityFilter};
pub use sync::{RecordingSync, SyncOptions, SyncReport};
pub use uploader::{Uploaded, Uploader};
