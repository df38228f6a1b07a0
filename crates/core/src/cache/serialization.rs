//! Pure functions for serializing cache payloads and change notifications.
//!
//! Payloads are stored as JSON bytes, which keeps cached values easy to
//! debug and lets any `Serialize` type pass through the cache unchanged.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::ChangeNotification;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a cache payload to JSON bytes.
pub fn serialize_payload<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a cache payload.
pub fn deserialize_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes a change notification to the JSON string written to the slot.
pub fn serialize_notification(notification: &ChangeNotification) -> Result<String> {
    serde_json::to_string(notification)
        .map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes a change notification read from the slot.
pub fn deserialize_notification(text: &str) -> Result<ChangeNotification> {
    serde_json::from_str(text).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
