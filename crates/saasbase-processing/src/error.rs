use saasbase_core::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The input bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The resize parameters cannot be applied
    #[error("Invalid resize parameters: {0}")]
    InvalidSpec(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::InvalidSpec(msg) => AppError::InvalidInput(msg),
            other => AppError::ImageProcessing(other.to_string()),
        }
    }
}
