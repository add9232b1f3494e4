//! saasbase storage library
//!
//! Object storage for media bytes behind the [`Storage`] trait, with an S3
//! backend (via `object_store`) and a local filesystem backend for
//! development.
//!
//! # Key format
//!
//! Keys are `/`-separated paths laid out as
//! `source_name/source_id[/usage][/media_id][/name]`; see
//! [`saasbase_core::models::SourceKey`]. Keys must not contain `..` or a
//! leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use saasbase_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
