//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use saasbase_core::AppError;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Services only ever address objects by key; which backend holds the bytes
/// is decided once at startup by [`crate::create_storage`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` to `storage_key`, replacing any existing object.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Read a whole object. A missing object is `StorageError::NotFound`.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Read a whole object, mapping a missing object to `None`.
    async fn download_if_exists(&self, storage_key: &str) -> StorageResult<Option<Vec<u8>>> {
        match self.download(storage_key).await {
            Ok(data) => Ok(Some(data)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete one object. Deleting a missing object succeeds.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Keys of every object under `prefix` (path-segment prefix, not string prefix).
    async fn list_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Delete every object under `prefix` and return how many were removed.
    async fn delete_prefix(&self, prefix: &str) -> StorageResult<usize> {
        let keys = self.list_prefix(prefix).await?;
        for key in &keys {
            self.delete(key).await?;
        }
        Ok(keys.len())
    }

    /// Generate a presigned PUT URL for direct uploads.
    ///
    /// The client uploads the object with a single HTTP PUT to the returned URL
    /// before `expires_in` elapses.
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use saasbase_core::ErrorMetadata;

    #[test]
    fn test_storage_error_maps_to_app_error() {
        let not_found: AppError = StorageError::NotFound("a/b".to_string()).into();
        assert_eq!(not_found.http_status_code(), 404);

        let invalid: AppError = StorageError::InvalidKey("..".to_string()).into();
        assert_eq!(invalid.http_status_code(), 400);

        let backend: AppError = StorageError::BackendError("timeout".to_string()).into();
        assert_eq!(backend.error_code(), "STORAGE_ERROR");
    }
}
