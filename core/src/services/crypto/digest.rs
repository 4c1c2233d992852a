//! Keyed blind-index digest using HMAC-SHA256.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// One-way keyed digest for equality lookups on sensitive values at rest
///
/// Deterministic for a fixed key and never reversible. Used for the email
/// lookup key and the refresh-token blind index.
#[derive(Clone)]
pub struct KeyedDigest {
    key: Vec<u8>,
}

impl KeyedDigest {
    /// Create a digest from the configured secret
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    /// Compute the hex-encoded HMAC-SHA256 tag of a message
    pub fn digest(&self, message: &str) -> String {
        // HMAC accepts keys of any length
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC can take a key of any size");
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
