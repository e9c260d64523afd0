//! HMAC-SHA256 signing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate an HMAC-SHA256 signature.
///
/// # Arguments
/// * `key` - Shared secret bytes
/// * `message` - Exact bytes to sign
///
/// # Returns
/// Lowercase hex-encoded digest (64 characters)
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key)
        .expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}
