//! Webhook signature verification.
//!
//! Every webhook delivery carries an `X-Signature` header holding the
//! lowercase hex HMAC-SHA256 of the raw request body, keyed by the secret
//! returned when the webhook was created. Verification recomputes the digest
//! over the exact bytes received and compares it in constant time.
//!
//! A mismatch is not an error: [`verify_webhook_signature`] always returns a
//! [`WebhookVerification`] and the caller decides what to do with it.

use std::io::{Cursor, Read};

use serde::de::DeserializeOwned;

use crate::{constant_time_compare, hmac_sha256, CryptoError, Result};

/// Request header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Outcome of checking one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookVerification {
    is_valid: bool,
    received_signature: String,
    computed_signature: String,
}

impl WebhookVerification {
    /// True when the received signature matches the computed one
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Signature as sent by the service
    #[must_use]
    pub fn received_signature(&self) -> &str {
        &self.received_signature
    }

    /// Signature computed locally from the body and secret
    #[must_use]
    pub fn computed_signature(&self) -> &str {
        &self.computed_signature
    }

    /// Turn a mismatch into an error for callers that treat it as fatal.
    ///
    /// # Errors
    /// Returns [`CryptoError::SignatureMismatch`] when the signature is invalid.
    pub fn ensure_valid(&self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(CryptoError::SignatureMismatch {
                received: self.received_signature.clone(),
                computed: self.computed_signature.clone(),
            })
        }
    }
}

/// Verify a webhook body against the signature header value.
///
/// # Arguments
/// * `body` - Raw request body, byte for byte as received
/// * `received_signature` - Value of the [`SIGNATURE_HEADER`] header
/// * `secret` - Shared secret of the webhook
///
/// # Example
/// ```
/// use clickup_crypto::verify_webhook_signature;
///
/// let result = verify_webhook_signature(
///     br#"{"event":"taskUpdated"}"#,
///     "2831500d379c7e90a2c8b3ff55dec81a42889b8a91f6b97f8513d98ebb6b23bf",
///     "imiO3dJZfIlyykAG",
/// );
/// assert!(result.is_valid());
/// ```
pub fn verify_webhook_signature(
    body: &[u8],
    received_signature: &str,
    secret: &str,
) -> WebhookVerification {
    let computed_signature = hmac_sha256(secret.as_bytes(), body);
    let is_valid =
        constant_time_compare(received_signature.as_bytes(), computed_signature.as_bytes());

    WebhookVerification {
        is_valid,
        received_signature: received_signature.to_string(),
        computed_signature,
    }
}

/// A webhook body buffered in memory.
///
/// Request bodies are usually single-use streams. Buffering once lets the
/// signature check and the JSON decode both see the identical bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookPayload {
    body: Vec<u8>,
}

impl WebhookPayload {
    /// Wrap an already-buffered body
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self { body: body.into() }
    }

    /// Drain `reader` into memory.
    ///
    /// # Errors
    /// Returns [`CryptoError::Io`] if reading fails.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        Ok(Self { body })
    }

    /// Verify this payload against a received signature.
    pub fn verify(&self, received_signature: &str, secret: &str) -> WebhookVerification {
        verify_webhook_signature(&self.body, received_signature, secret)
    }

    /// Raw bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// A fresh reader over the raw bytes
    #[must_use]
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.body.as_slice())
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    /// Returns [`CryptoError::Payload`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Give the buffered bytes back
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}

impl From<Vec<u8>> for WebhookPayload {
    fn from(body: Vec<u8>) -> Self {
        Self::new(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "imiO3dJZfIlyykAG";
    const BODY: &[u8] = br#"{"event":"taskUpdated"}"#;
    const SIGNATURE: &str = "2831500d379c7e90a2c8b3ff55dec81a42889b8a91f6b97f8513d98ebb6b23bf";

    #[test]
    fn test_known_signature_is_valid() {
        let result = verify_webhook_signature(BODY, SIGNATURE, SECRET);
        assert!(result.is_valid());
        assert_eq!(result.received_signature(), SIGNATURE);
        assert_eq!(result.computed_signature(), SIGNATURE);
        assert!(result.ensure_valid().is_ok());
    }

    #[test]
    fn test_wrong_secret_is_reported_not_raised() {
        let result = verify_webhook_signature(BODY, SIGNATURE, "another-secret");
        assert!(!result.is_valid());
        assert_eq!(result.received_signature(), SIGNATURE);
        assert_ne!(result.computed_signature(), SIGNATURE);
        assert!(matches!(
            result.ensure_valid(),
            Err(CryptoError::SignatureMismatch { .. })
        ));
    }

    #[test]
    fn test_tampered_body() {
        let result = verify_webhook_signature(br#"{"event":"taskDeleted"}"#, SIGNATURE, SECRET);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_empty_signature_header() {
        let result = verify_webhook_signature(BODY, "", SECRET);
        assert!(!result.is_valid());
        assert_eq!(result.received_signature(), "");
    }

    #[test]
    fn test_payload_readable_after_verification() {
        let payload = WebhookPayload::read_from(BODY).unwrap();
        assert!(payload.verify(SIGNATURE, SECRET).is_valid());

        let mut first = Vec::new();
        payload.reader().read_to_end(&mut first).unwrap();
        assert_eq!(first, BODY);

        let mut second = String::new();
        payload.reader().read_to_string(&mut second).unwrap();
        assert_eq!(second.as_bytes(), BODY);

        let value: serde_json::Value = payload.json().unwrap();
        assert_eq!(value["event"], "taskUpdated");
        assert_eq!(payload.into_bytes(), BODY);
    }

    #[test]
    fn test_payload_json_error() {
        let payload = WebhookPayload::new(b"not json".to_vec());
        let err = payload.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, CryptoError::Payload(_)));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    #[test]
    fn test_read_error_surfaces() {
        let err = WebhookPayload::read_from(FailingReader).unwrap_err();
        assert!(matches!(err, CryptoError::Io(_)));
    }

    proptest! {
        #[test]
        fn prop_computed_signature_round_trips(
            body in proptest::collection::vec(any::<u8>(), 0..512),
            secret in ".{0,64}",
        ) {
            let first = verify_webhook_signature(&body, "", &secret);
            let again = verify_webhook_signature(&body, first.computed_signature(), &secret);
            prop_assert!(again.is_valid());
            prop_assert_eq!(first.computed_signature(), again.computed_signature());
        }
    }
}
