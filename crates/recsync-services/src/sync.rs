//! One synchronization run: load index → scan → upload → append → save.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use recsync_core::AppConfig;
use recsync_storage::Storage;

use crate::error::SyncResult;
use crate::index::{create_index_store, IndexStore};
use crate::scanner::{DirectoryScanner, StabilityFilter};
use crate::uploader::Uploader;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Scan and report only; nothing is uploaded or written.
    pub dry_run: bool,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// New stable files found by the scan.
    pub discovered: Vec<PathBuf>,
    pub uploaded: usize,
    pub failed: usize,
    pub index_written: bool,
}

/// Runs the whole pipeline against one watch root and one index.
pub struct RecordingSync {
    watch_root: PathBuf,
    topic_prefix: String,
    scanner: DirectoryScanner,
    uploader: Uploader,
    index_store: Box<dyn IndexStore>,
}

impl RecordingSync {
    pub fn new(
        watch_root: impl Into<PathBuf>,
        topic_prefix: impl Into<String>,
        scanner: DirectoryScanner,
        uploader: Uploader,
        index_store: Box<dyn IndexStore>,
    ) -> Self {
        Self {
            watch_root: watch_root.into(),
            topic_prefix: topic_prefix.into(),
            scanner,
            uploader,
            index_store,
        }
    }

    /// Wire everything from configuration around an already built storage backend.
    pub fn from_config(config: &AppConfig, storage: Arc<dyn Storage>) -> Self {
        let filter = StabilityFilter::new(config.media_extension(), config.stable_after());
        let index_store = create_index_store(config, storage.clone());
        Self::new(
            config.watch_root(),
            config.topic_prefix.clone(),
            DirectoryScanner::new(filter),
            Uploader::new(storage, config.key_prefix()),
            index_store,
        )
    }

    /// Execute one run.
    ///
    /// Only fatal errors are returned: an unreadable or malformed index, an unreadable
    /// watch root, or a failed index write. A file that fails to upload is logged and
    /// left for the next run.
    pub async fn run(&self, options: SyncOptions) -> SyncResult<SyncReport> {
        let loaded = self.index_store.load().await?;
        let existed = loaded.existed;
        let mut index = loaded.index;
        let known = index.known_files();
        tracing::info!(
            index = %self.index_store.location(),
            records = index.len(),
            "Index loaded"
        );

        let files = self
            .scanner
            .scan(&self.watch_root, &known, SystemTime::now())?;

        let mut report = SyncReport {
            discovered: files.clone(),
            ..SyncReport::default()
        };

        if options.dry_run {
            for path in &files {
                tracing::info!(path = %path.display(), "Would upload");
            }
            return Ok(report);
        }

        if files.is_empty() {
            if !existed {
                self.index_store.save(&index).await?;
                report.index_written = true;
                tracing::info!(
                    watch_dir = %self.watch_root.display(),
                    index = %self.index_store.location(),
                    "No recordings found, created empty index"
                );
            } else {
                tracing::info!(watch_dir = %self.watch_root.display(), "No new recordings");
            }
            return Ok(report);
        }

        for path in &files {
            let uploaded = match self.uploader.upload(path).await {
                Ok(uploaded) => uploaded,
                Err(e) if !e.is_fatal() => {
                    tracing::error!(path = %path.display(), error = %e, "Upload failed");
                    report.failed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.uploader.recording_for(&uploaded, &self.topic_prefix) {
                Ok(recording) => {
                    if index.append(recording) {
                        report.uploaded += 1;
                    }
                }
                Err(e) => {
                    // The object is stored but stays out of the index until a later run.
                    tracing::error!(path = %path.display(), error = %e, "Stat failed after upload");
                    report.failed += 1;
                }
            }
        }

        self.index_store.save(&index).await?;
        report.index_written = true;

        tracing::info!(
            index = %self.index_store.location(),
            uploaded = report.uploaded,
            failed = report.failed,
            records = index.len(),
            "Index updated"
        );
        Ok(report)
    }
}
