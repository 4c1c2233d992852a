//! Token entities for the JWT session lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TokenError;

/// Claims structure for the JWT payload
///
/// Access and refresh tokens carry exactly this claim set; the two are
/// distinguished only by their embedded expiry and by which store, if any,
/// retains them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (stringified user id)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a token issued now-ish at `issued_at` expiring at
    /// `expires_at`
    pub fn new(
        subject: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: subject.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Freshly minted access/refresh pair handed back to the client
///
/// `issued_at` is shared between the pair to support later bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedTokens {
    /// Signed JWT access token (short-lived, stateless)
    pub access_token: String,

    /// Signed JWT refresh token (long-lived, persisted encrypted)
    pub refresh_token: String,

    /// Shared issuance instant of the pair
    pub issued_at: DateTime<Utc>,

    /// When the access token stops verifying under strict policies
    pub access_expires_at: DateTime<Utc>,

    /// When the refresh token (and its storage record) expires
    pub refresh_expires_at: DateTime<Utc>,
}

/// Refresh token row as persisted
///
/// The access token is stored in plaintext as the lookup key; the refresh
/// token only ever reaches storage encrypted, alongside its blind index.
/// At most one live record exists per (user_id, access_token) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub user_id: i64,

    /// Plaintext access token, the natural lookup key
    pub access_token: String,

    /// Refresh token ciphertext (reversibly encrypted)
    pub refresh_token: String,

    /// Keyed digest of the plaintext refresh token, for equality search
    /// without decrypting
    pub refresh_token_key: String,

    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Row replacement applied when a pair is rotated on refresh
///
/// Keyed by the old access token; rewrites the record to reference the new
/// access token and the new encrypted refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRotation {
    pub user_id: i64,
    pub old_access_token: String,
    pub new_access_token: String,

    /// New refresh token ciphertext
    pub refresh_token: String,

    /// Blind index of the new plaintext refresh token
    pub refresh_token_key: String,

    pub expires_at: DateTime<Utc>,
}

/// Verified-request context decoded from a presented token
///
/// Ephemeral: reconstructed per request, never persisted. `refresh_token`
/// is present only in flows that carry both values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUser {
    pub sub: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl TokenUser {
    /// Parse the subject claim back into the integer user key
    ///
    /// A non-numeric subject means the token was not minted by us.
    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::CredentialsInvalid)
    }
}
