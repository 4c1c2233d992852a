//! Reversible at-rest encryption using AES-256-GCM.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::errors::CryptoError;

/// AES-GCM nonce size in bytes
const NONCE_SIZE: usize = 12;

/// Symmetric cipher with a single process-wide key
///
/// Encryption is randomized (fresh nonce per call) but always invertible
/// with the same key. The encoded form is base64 over nonce ‖ ciphertext,
/// suitable for a text column.
#[derive(Clone)]
pub struct AesCipher {
    key: [u8; 32],
}

impl AesCipher {
    /// Create a cipher from the configured secret
    ///
    /// The 256-bit key is the SHA-256 digest of the secret, so secrets of
    /// any length are accepted.
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Generate a random nonce for AES-GCM
    fn generate_nonce() -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }

    /// Encrypt arbitrary bytes into a base64 string
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, CryptoError> {
        let key = Key::<Aes256Gcm>::from_slice(&self.key);
        let cipher = Aes256Gcm::new(key);

        let nonce_bytes = Self::generate_nonce();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut raw = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        raw.extend_from_slice(&nonce_bytes);
        raw.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(raw))
    }

    /// Decrypt a base64 string produced by [`encrypt`](Self::encrypt)
    ///
    /// Fails on tampered, truncated, or undecodable input and on key
    /// mismatch.
    pub fn decrypt(&self, encoded: &str) -> Result<Vec<u8>, CryptoError> {
        let raw = BASE64
            .decode(encoded)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        if raw.len() < NONCE_SIZE {
            return Err(CryptoError::DecryptionFailed);
        }
        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_SIZE);

        let key = Key::<Aes256Gcm>::from_slice(&self.key);
        let cipher = Aes256Gcm::new(key);
        let nonce = Nonce::from_slice(nonce_bytes);

        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }

    /// Encrypt a UTF-8 string
    pub fn encrypt_str(&self, plaintext: &str) -> Result<String, CryptoError> {
        self.encrypt(plaintext.as_bytes())
    }

    /// Decrypt back into a UTF-8 string
    pub fn decrypt_str(&self, encoded: &str) -> Result<String, CryptoError> {
        let plaintext = self.decrypt(encoded)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
    }
}
