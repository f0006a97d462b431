use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Recording;

/// The ordered collection of published recordings, most recent `start` first.
///
/// The order is restored with a full sort after every mutation. Records loaded from
/// disk keep whatever order they were stored in until the first append.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    records: Vec<Recording>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Recording>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Recording] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Recording> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Base names of every file already published. Records without a `file` are ignored.
    pub fn known_files(&self) -> HashSet<String> {
        self.records
            .iter()
            .filter(|r| !r.file.is_empty())
            .map(|r| r.file.clone())
            .collect()
    }

    pub fn contains_file(&self, file: &str) -> bool {
        !file.is_empty() && self.records.iter().any(|r| r.file == file)
    }

    /// Add a record and restore descending `start` order.
    ///
    /// Returns `false` (and leaves the index untouched) when a record for the same
    /// `file` is already present.
    pub fn append(&mut self, record: Recording) -> bool {
        if self.contains_file(&record.file) {
            tracing::warn!(file = %record.file, "Recording already indexed, not appending");
            return false;
        }
        self.records.push(record);
        // RFC 3339 UTC strings sort lexicographically in time order
        self.records.sort_by(|a, b| b.start.cmp(&a.start));
        true
    }
}
