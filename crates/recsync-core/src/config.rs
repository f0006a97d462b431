//! Configuration module
//!
//! The configuration is a single JSON document read once per run. String fields use
//! empty-as-unset semantics so the template written on first run can list every field.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_INDEX_KEY, DEFAULT_MEDIA_EXTENSION,
    DEFAULT_STABLE_AFTER_SECS, DEFAULT_TOPIC_PREFIX, DEFAULT_VIDEO_PREFIX,
};
use crate::storage_types::StorageBackend;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} is required in the config")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Failed to write config template {}: {source}", path.display())]
    WriteTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Explicit credentials for the object storage client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Where the index document is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexLocation {
    /// Local file replaced atomically on save.
    File(PathBuf),
    /// Object in the configured bucket.
    Remote(String),
}

/// Result of [`AppConfig::load`].
#[derive(Debug)]
pub enum ConfigLoad {
    Loaded(Box<AppConfig>),
    /// No config existed; a template was written at this path.
    TemplateCreated(PathBuf),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub watch_dir: String,
    pub bucket: String,
    pub region: String,
    #[serde(alias = "prefix")]
    pub video_prefix: String,
    pub base_url: String,
    pub topic_prefix: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub aws_session_token: String,
    /// Custom endpoint for S3-compatible providers (MinIO, Spaces, ...)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    pub storage_backend: StorageBackend,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub local_storage_path: String,
    /// Local index file; when empty the index lives in the bucket under `index_key`.
    pub json_path: String,
    pub index_key: String,
    pub media_extension: String,
    pub stable_after_secs: Option<u64>,
}

impl AppConfig {
    /// Placeholder values written on first run.
    pub fn template() -> Self {
        Self {
            watch_dir: "/path/to/zoom/recordings".to_string(),
            bucket: "recordings-yourname".to_string(),
            region: "us-east-1".to_string(),
            video_prefix: DEFAULT_VIDEO_PREFIX.to_string(),
            topic_prefix: "Level 1".to_string(),
            aws_access_key_id: "YOUR_ACCESS_KEY_ID".to_string(),
            aws_secret_access_key: "YOUR_SECRET_ACCESS_KEY".to_string(),
            index_key: DEFAULT_INDEX_KEY.to_string(),
            media_extension: DEFAULT_MEDIA_EXTENSION.to_string(),
            stable_after_secs: Some(DEFAULT_STABLE_AFTER_SECS),
            ..Self::default()
        }
    }

    /// Read the config at `path`, or write a template there if it does not exist.
    pub fn load(path: &Path) -> Result<ConfigLoad, ConfigError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Self::template().write_to(path)?;
                tracing::info!(path = %path.display(), "Config template created");
                return Ok(ConfigLoad::TemplateCreated(path.to_path_buf()));
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_slice(&data)?;
        tracing::debug!(path = %path.display(), "Config loaded");
        Ok(ConfigLoad::Loaded(Box::new(config)))
    }

    /// Parse, fill in defaults and validate.
    pub fn from_slice(data: &[u8]) -> Result<Self, ConfigError> {
        let mut config: AppConfig = serde_json::from_slice(data)?;
        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    fn apply_defaults(&mut self) {
        if self.topic_prefix.is_empty() {
            self.topic_prefix = DEFAULT_TOPIC_PREFIX.to_string();
        }
        if self.video_prefix.is_empty() {
            self.video_prefix = DEFAULT_VIDEO_PREFIX.to_string();
        }
        if self.index_key.is_empty() {
            self.index_key = DEFAULT_INDEX_KEY.to_string();
        }
        if self.media_extension.is_empty() {
            self.media_extension = DEFAULT_MEDIA_EXTENSION.to_string();
        }
        if !self.media_extension.starts_with('.') {
            self.media_extension.insert(0, '.');
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch_dir.trim().is_empty() {
            return Err(ConfigError::MissingField("watchDir"));
        }
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::MissingField("bucket"));
        }
        if self.region.trim().is_empty() {
            return Err(ConfigError::MissingField("region"));
        }
        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_empty() {
            return Err(ConfigError::MissingField("localStoragePath"));
        }
        if self.index_key.starts_with('/') || self.index_key.contains("..") {
            return Err(ConfigError::InvalidValue {
                field: "indexKey",
                reason: "must be a relative key without '..'".to_string(),
            });
        }
        Ok(())
    }

    fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let wrap = |source| ConfigError::WriteTemplate {
            path: path.to_path_buf(),
            source,
        };

        let mut body = serde_json::to_vec_pretty(self)?;
        body.push(b'\n');

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path).map_err(wrap)?;
        file.write_all(&body).map_err(wrap)?;
        file.sync_all().map_err(wrap)
    }

    pub fn watch_root(&self) -> &Path {
        Path::new(&self.watch_dir)
    }

    /// Public URL prefix for uploaded objects, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        if !self.base_url.is_empty() {
            return self.base_url.trim_end_matches('/').to_string();
        }
        format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region)
    }

    /// Object key prefix with surrounding slashes removed; may be empty.
    pub fn key_prefix(&self) -> &str {
        self.video_prefix.trim_matches('/')
    }

    /// Explicit credentials, if both key id and secret are configured.
    pub fn credentials(&self) -> Option<Credentials> {
        if self.aws_access_key_id.is_empty() || self.aws_secret_access_key.is_empty() {
            return None;
        }
        Some(Credentials {
            access_key_id: self.aws_access_key_id.clone(),
            secret_access_key: self.aws_secret_access_key.clone(),
            session_token: Some(self.aws_session_token.clone()).filter(|t| !t.is_empty()),
        })
    }

    pub fn endpoint(&self) -> Option<&str> {
        Some(self.endpoint.as_str()).filter(|e| !e.is_empty())
    }

    /// Where the index lives. An empty `index_key` means the default key.
    pub fn index_location(&self) -> IndexLocation {
        if self.json_path.is_empty() {
            let key = match self.index_key.trim_matches('/') {
                "" => DEFAULT_INDEX_KEY,
                key => key,
            };
            IndexLocation::Remote(key.to_string())
        } else {
            IndexLocation::File(PathBuf::from(&self.json_path))
        }
    }

    /// Recording extension with its leading dot; `.mp4` when unset.
    pub fn media_extension(&self) -> String {
        match self.media_extension.trim() {
            "" => DEFAULT_MEDIA_EXTENSION.to_string(),
            ext if ext.starts_with('.') => ext.to_string(),
            ext => format!(".{}", ext),
        }
    }

    pub fn stable_after(&self) -> Duration {
        Duration::from_secs(self.stable_after_secs.unwrap_or(DEFAULT_STABLE_AFTER_SECS))
    }
}

/// Pick the config file: explicit path, then `CONFIG_PATH`, then `config.json`
/// next to the executable, then `config.json` in the working directory.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    match std::env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
        Err(_) => PathBuf::from(CONFIG_FILE_NAME),
    }
}
