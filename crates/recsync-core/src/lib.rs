//! Recsync Core Library
//!
//! This crate provides the domain model (recordings and the ordered index),
//! configuration loading and the constants shared by all recsync components.

pub mod config;
pub mod constants;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{
    resolve_config_path, AppConfig, ConfigError, ConfigLoad, Credentials, IndexLocation,
};
pub use models::{Index, Recording};
pub use storage_types::StorageBackend;
