//! User entity as seen by the session core.

use chrono::{DateTime, Utc};

/// Credential principal
///
/// The core treats the user as an integer key plus opaque credential
/// material; profile fields live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,

    /// Keyed digest of the user's email, the lookup key for encrypted
    /// email storage
    pub email_key: String,

    /// Opaque credential material checked by the credential verifier
    pub password_hash: String,

    pub last_login_at: Option<DateTime<Utc>>,
    pub last_login_ip: Option<String>,
}

impl User {
    /// Creates a user with no login history
    pub fn new(id: i64, email_key: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            email_key: email_key.into(),
            password_hash: password_hash.into(),
            last_login_at: None,
            last_login_ip: None,
        }
    }
}
