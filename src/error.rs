//! Error types for the instrumentation layer.

use thiserror::Error;

/// Main error type for instrumentation operations.
#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("max_age must be at least 2, got {0}")]
    InvalidMaxAge(usize),

    #[error("instrumentation has not been attached to a store yet")]
    NotInstrumented,

    #[error("instrumentation is already attached to a store")]
    AlreadyInstrumented,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid snapshot format: {0}")]
    InvalidFormat(String),

    #[error("Checksum mismatch: expected {expected}, got {got}")]
    ChecksumMismatch { expected: u32, got: u32 },
}

impl From<serde_json::Error> for InstrumentError {
    fn from(e: serde_json::Error) -> Self {
        InstrumentError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for InstrumentError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        InstrumentError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for InstrumentError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        InstrumentError::Deserialization(e.to_string())
    }
}

/// Result type for instrumentation operations.
pub type Result<T> = std::result::Result<T, InstrumentError>;
