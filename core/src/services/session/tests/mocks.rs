//! Test doubles for the session service tests.

use crate::services::session::credentials::CredentialVerifier;

/// Credential predicate that treats the stored hash as the plaintext
/// password
pub struct PlainTextVerifier;

impl CredentialVerifier for PlainTextVerifier {
    fn verify(&self, password: &str, password_hash: &str) -> bool {
        password == password_hash
    }
}
