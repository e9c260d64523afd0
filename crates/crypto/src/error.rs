//! Error types for the crypto crate.

use thiserror::Error;

/// Result type alias for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur during crypto operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Received and computed signatures differ
    #[error("Signature mismatch: received {received:?}, computed {computed:?}")]
    SignatureMismatch {
        /// Value taken from the request header
        received: String,
        /// Value computed from the payload
        computed: String,
    },

    /// Reading the webhook body failed
    #[error("Failed to read webhook body: {0}")]
    Io(#[from] std::io::Error),

    /// Webhook body is not the expected JSON document
    #[error("Invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),
}
