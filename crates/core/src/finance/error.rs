use thiserror::Error;

/// Errors raised when a backend payload does not match any known schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Unknown {entity} schema (fields: {fields})")]
    UnknownSchema {
        entity: &'static str,
        fields: String,
    },
    #[error("Expected {expected} for {entity}")]
    UnexpectedShape {
        entity: &'static str,
        expected: &'static str,
    },
    #[error("Malformed {entity}: {message}")]
    Malformed {
        entity: &'static str,
        message: String,
    },
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
