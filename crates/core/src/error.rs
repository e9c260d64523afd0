//! Error types for the core crate.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors raised by the pure helpers in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A chunk size of zero cannot partition anything
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    /// Timestamp string was not a base-10 millisecond count
    #[error("invalid millisecond timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The raw value received from the service
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

impl CoreError {
    /// Create a timestamp error
    pub fn invalid_timestamp(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            reason: reason.into(),
        }
    }
}
