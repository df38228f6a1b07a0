use thiserror::Error;

use finanzas_core::cache::{CacheError, SerializationError};
use finanzas_core::finance::AdapterError;

use crate::error::ClientError;

/// Errors surfaced by gateway reads.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("Loader failed: {0}")]
    Loader(String),
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
