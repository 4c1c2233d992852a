//! Error type definitions for token verification, cryptography, and storage.

use thiserror::Error;

/// Token verification and lifecycle errors
///
/// `CredentialsInvalid` deliberately covers every malformed/forged/mismatch
/// case so the boundary layer cannot leak which part of a bad request was
/// wrong. `TokenExpired` stays distinct: it tells a client to refresh rather
/// than re-login.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid authentication credentials")]
    CredentialsInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("User token not found")]
    TokenNotFound,
}

/// Cryptographic primitive errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,

    /// Tampered or truncated ciphertext, or key mismatch. Decryption never
    /// silently yields garbage that could pass for a valid token.
    #[error("Decryption failed")]
    DecryptionFailed,
}

/// Persistence-layer failure
///
/// Carries no business meaning; an absent row is a normal empty result,
/// not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Storage error: {message}")]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
