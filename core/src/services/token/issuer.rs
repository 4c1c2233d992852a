//! Token pair issuance.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::domain::entities::token::{Claims, IssuedTokens};
use crate::errors::{DomainError, DomainResult};

use super::config::TokenConfig;

/// Mints signed access/refresh token pairs
///
/// Pure minting: never touches storage. Both tokens are signed HS256 with
/// the same key and share their `iat`; only the embedded expiry differs.
pub struct TokenIssuer {
    config: TokenConfig,
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    /// Creates a new issuer from configuration
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            config,
            encoding_key,
        }
    }

    /// Issue a fresh access/refresh pair for a subject
    ///
    /// Expiries are computed from the current time plus the configured
    /// lifetimes.
    pub fn issue(&self, subject: &str) -> DomainResult<IssuedTokens> {
        let issued_at = Utc::now();
        let access_expires_at =
            issued_at + Duration::minutes(self.config.access_token_expiry_minutes);
        let refresh_expires_at = issued_at + Duration::days(self.config.refresh_token_expiry_days);

        let access_claims = Claims::new(subject, issued_at, access_expires_at);
        let refresh_claims = Claims::new(subject, issued_at, refresh_expires_at);

        Ok(IssuedTokens {
            access_token: self.encode(&access_claims)?,
            refresh_token: self.encode(&refresh_claims)?,
            issued_at,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Encodes claims into a signed JWT
    fn encode(&self, claims: &Claims) -> DomainResult<String> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            DomainError::Internal {
                message: format!("token encoding failed: {e}"),
            }
        })
    }
}
