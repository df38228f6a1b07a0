use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Publish failed: {0}")]
    PublishFailed(String),
    #[error("Change slot error: {0}")]
    Slot(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
