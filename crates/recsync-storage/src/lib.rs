//! Recsync Storage Library
//!
//! This crate provides the object storage abstraction recordings are uploaded
//! through, with implementations for S3 and the local filesystem.
//!
//! # Storage key format
//!
//! Recording keys are `{prefix}/{date}/{filename}`, or `{date}/{filename}` when the
//! prefix is empty. The date segment comes from the recording's folder name. Key
//! generation lives in the `keys` module so every backend publishes the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::build_object_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use recsync_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
