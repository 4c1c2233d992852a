//! Configuration for token issuance and verification.

use sg_shared::config::AuthConfig;

/// Configuration shared by the token issuer and verifier
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// JWT signing secret
    pub jwt_secret: String,

    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,

    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            access_token_expiry_minutes: 10,
            refresh_token_expiry_days: 7,
        }
    }
}

impl From<&AuthConfig> for TokenConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            access_token_expiry_minutes: config.access_token_expire_minutes,
            refresh_token_expiry_days: config.refresh_token_expire_days,
        }
    }
}
