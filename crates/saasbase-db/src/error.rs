use saasbase_core::AppError;
use thiserror::Error;

/// Index operation errors
#[derive(Debug, Error)]
pub enum IndexError {
    /// A conditional write lost against a concurrent writer
    #[error("Conditional write failed: {0}")]
    Conflict(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Malformed item: {0}")]
    InvalidItem(String),

    #[error("Index backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

impl From<IndexError> for AppError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Conflict(msg) => AppError::Conflict(msg),
            IndexError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Index(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saasbase_core::ErrorMetadata;

    #[test]
    fn test_index_error_maps_to_app_error() {
        let conflict: AppError = IndexError::Conflict("slot moved".to_string()).into();
        assert_eq!(conflict.http_status_code(), 409);

        let backend: AppError = IndexError::Backend("throttled".to_string()).into();
        assert_eq!(backend.http_status_code(), 500);
        assert_eq!(backend.error_code(), "INDEX_ERROR");
    }
}
