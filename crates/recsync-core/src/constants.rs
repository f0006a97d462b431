//! Shared constants

/// Topic label used when `topicPrefix` is empty.
pub const DEFAULT_TOPIC_PREFIX: &str = "Class";

/// Object key prefix used when `videoPrefix` is empty.
pub const DEFAULT_VIDEO_PREFIX: &str = "level1";

/// Only files with this extension are uploaded (compared case-insensitively).
pub const DEFAULT_MEDIA_EXTENSION: &str = ".mp4";

/// Minimum age of a file's last modification before it counts as finished.
pub const DEFAULT_STABLE_AFTER_SECS: u64 = 30;

/// Key of the index document when it lives in the bucket.
pub const DEFAULT_INDEX_KEY: &str = "recordings.json";

pub const INDEX_CONTENT_TYPE: &str = "application/json";

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
