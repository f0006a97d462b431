//! Discovery of finished recordings under the watch root.

use std::collections::HashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

use crate::error::{SyncError, SyncResult};

/// What the stability filter looks at for one filesystem entry.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub is_dir: bool,
    pub name: String,
    pub modified: SystemTime,
}

impl Candidate {
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata) -> std::io::Result<Self> {
        Ok(Self {
            is_dir: metadata.is_dir(),
            name: name.into(),
            modified: metadata.modified()?,
        })
    }
}

/// Decides whether a file is finished being written.
///
/// There is no lock or completion marker: a file counts as finished once its last
/// modification is at least `stable_after` old.
#[derive(Debug, Clone)]
pub struct StabilityFilter {
    extension: String,
    stable_after: Duration,
}

impl StabilityFilter {
    /// `extension` includes the leading dot, e.g. `.mp4`.
    pub fn new(extension: impl Into<String>, stable_after: Duration) -> Self {
        Self {
            extension: extension.into(),
            stable_after,
        }
    }

    pub fn has_media_extension(&self, name: &str) -> bool {
        match Path::new(name).extension() {
            Some(ext) => {
                let wanted = self.extension.trim_start_matches('.');
                ext.to_string_lossy().eq_ignore_ascii_case(wanted)
            }
            None => false,
        }
    }

    pub fn is_eligible(&self, candidate: &Candidate, now: SystemTime) -> bool {
        if candidate.is_dir {
            return false;
        }
        if !self.has_media_extension(&candidate.name) {
            return false;
        }
        // A modification time in the future counts as still being written.
        match now.duration_since(candidate.modified) {
            Ok(age) => age >= self.stable_after,
            Err(_) => false,
        }
    }
}

/// Recursively lists new, finished recordings under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    filter: StabilityFilter,
}

impl DirectoryScanner {
    pub fn new(filter: StabilityFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &StabilityFilter {
        &self.filter
    }

    /// Walk `root` and return paths of eligible files whose base name is not in `known`.
    ///
    /// Matching is by base name only, so when the same name appears in several
    /// folders only the first one walked is returned. Unreadable entries are logged
    /// and skipped; an unreadable root fails the scan.
    pub fn scan(
        &self,
        root: &Path,
        known: &HashSet<String>,
        now: SystemTime,
    ) -> SyncResult<Vec<PathBuf>> {
        let root_meta = std::fs::metadata(root).map_err(|e| SyncError::WatchRoot {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !root_meta.is_dir() {
            return Err(SyncError::WatchRoot {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let mut found = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(SyncError::WatchRoot {
                        path: root.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Walk error, skipping entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.filter.has_media_extension(&name) {
                continue;
            }
            if known.contains(&name) || seen.contains(&name) {
                continue;
            }

            let candidate = match entry
                .metadata()
                .map_err(std::io::Error::from)
                .and_then(|m| Candidate::from_metadata(name.clone(), &m))
            {
                Ok(candidate) => candidate,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Stat error, skipping file");
                    continue;
                }
            };

            if !self.filter.is_eligible(&candidate, now) {
                tracing::debug!(path = %entry.path().display(), "File not stable yet");
                continue;
            }

            seen.insert(name);
            found.push(entry.into_path());
        }

        tracing::debug!(root = %root.display(), found = found.len(), "Scan complete");
        Ok(found)
    }
}
