//! Request and response bodies for the auth routes.

use serde::{Deserialize, Serialize};

use sg_core::domain::entities::token::IssuedTokens;

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Access/refresh pair submitted in the body of an API refresh call
///
/// Both fields are optional at the parsing layer; the verifier decides that
/// an absent value means invalid credentials rather than a 400.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Token pair response for API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,

    /// Shared issuance instant of the pair, as a unix timestamp
    pub issued_at: i64,

    /// Access token expiry as a unix timestamp
    pub access_expires_at: i64,

    /// Refresh token expiry as a unix timestamp
    pub refresh_expires_at: i64,
}

impl From<IssuedTokens> for TokenResponse {
    fn from(tokens: IssuedTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            issued_at: tokens.issued_at.timestamp(),
            access_expires_at: tokens.access_expires_at.timestamp(),
            refresh_expires_at: tokens.refresh_expires_at.timestamp(),
        }
    }
}
