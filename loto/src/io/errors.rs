//! Error types for saving and loading events.

use thiserror::Error;

/// Errors that can occur while reading or writing a save file or an export
#[derive(Debug, Error)]
pub enum SerializationError {
    /// Underlying stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode a field
    #[error("Failed to encode field: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Failed to decode a field
    #[error("Failed to decode field: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A length prefix announced more data than a field may hold
    #[error("Field size {actual} exceeds maximum {max}")]
    FieldTooLarge { actual: u64, max: u64 },

    /// Data is well-formed for the codec but not for the domain
    #[error("Invalid save format: {0}")]
    InvalidFormat(String),
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, SerializationError>;
