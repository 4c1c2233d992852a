//! Authentication and token cryptography configuration

use serde::{Deserialize, Serialize};
use std::env;

/// JWT and at-rest cryptography configuration
///
/// All secrets are read once at process start and treated as immutable for
/// the lifetime of the process.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret key for signing JWT access and refresh tokens
    pub jwt_secret: String,

    /// Access token lifetime in minutes
    pub access_token_expire_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_token_expire_days: i64,

    /// Secret for the reversible cipher protecting refresh tokens at rest
    pub cipher_secret: String,

    /// Secret for the keyed digest used as a blind index on encrypted values
    pub digest_secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::from("development-jwt-secret-change-in-production"),
            access_token_expire_minutes: 10,
            refresh_token_expire_days: 7,
            cipher_secret: String::from("development-cipher-secret-change-in-production"),
            digest_secret: String::from("development-digest-secret-change-in-production"),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            access_token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.access_token_expire_minutes),
            refresh_token_expire_days: env::var("REFRESH_TOKEN_EXPIRE_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_token_expire_days),
            cipher_secret: env::var("CIPHER_SECRET").unwrap_or(defaults.cipher_secret),
            digest_secret: env::var("DIGEST_SECRET").unwrap_or(defaults.digest_secret),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expire_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expire_days = days;
        self
    }

    /// Check if any secret is still a development placeholder
    pub fn is_using_default_secrets(&self) -> bool {
        let defaults = Self::default();
        self.jwt_secret == defaults.jwt_secret
            || self.cipher_secret == defaults.cipher_secret
            || self.digest_secret == defaults.digest_secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetimes() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_expire_minutes, 10);
        assert_eq!(config.refresh_token_expire_days, 7);
        assert!(config.is_using_default_secrets());
    }

    #[test]
    fn test_builder_helpers() {
        let config = AuthConfig::default()
            .with_access_expiry_minutes(5)
            .with_refresh_expiry_days(30);
        assert_eq!(config.access_token_expire_minutes, 5);
        assert_eq!(config.refresh_token_expire_days, 30);
    }
}
