//! saasbase core library
//!
//! Domain models, error types, configuration and the small pure helpers
//! (resource naming, canonical hashing) shared by every saasbase crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod hashing;
pub mod models;
pub mod naming;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hashing::{canonicalize, hash_object};
pub use naming::{kebab_case, NamingConvention};
pub use storage_types::{IndexBackend, StorageBackend};
