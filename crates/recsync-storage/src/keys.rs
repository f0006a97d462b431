//! Object key generation for recordings.
//!
//! Recordings are expected to live in folders named `"<date> <description>"`, for
//! example `2024-01-15 Algebra Session`. The token before the first space of the
//! folder name becomes the date segment. It is not validated, so `Algebra Session`
//! yields `Algebra`. A folder name without a space, or one starting with a space,
//! has no date token and falls back to the file's modification date (UTC).

use chrono::{DateTime, Utc};
use std::path::Path;

/// Build `{prefix}/{date}/{filename}` for a recording at `path`.
///
/// `prefix` is trimmed of slashes; when it is empty the key is `{date}/{filename}`.
pub fn build_object_key(prefix: &str, path: &Path, modified: DateTime<Utc>) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parent = path
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let date = match parent.split_once(' ') {
        Some((token, _)) if !token.is_empty() => token.to_string(),
        _ => modified.format("%Y-%m-%d").to_string(),
    };

    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{}/{}", date, base)
    } else {
        format!("{}/{}/{}", prefix, date, base)
    }
}

/// Reject keys that could escape a storage root.
pub fn validate_key(key: &str) -> bool {
    !key.is_empty() && !key.contains("..") && !key.starts_with('/')
}
