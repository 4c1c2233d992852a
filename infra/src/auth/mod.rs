//! Password credential verification.

use tracing::warn;

use sg_core::services::session::CredentialVerifier;

/// Bcrypt-backed implementation of the opaque credential predicate
pub struct BcryptVerifier;

impl CredentialVerifier for BcryptVerifier {
    fn verify(&self, password: &str, password_hash: &str) -> bool {
        match bcrypt::verify(password, password_hash) {
            Ok(matches) => matches,
            Err(error) => {
                // A malformed stored hash counts as a failed login
                warn!("bcrypt verification error: {error}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_matching_password() {
        let hash = bcrypt::hash("hunter2", 4).unwrap();
        let verifier = BcryptVerifier;

        assert!(verifier.verify("hunter2", &hash));
        assert!(!verifier.verify("not-hunter2", &hash));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        let verifier = BcryptVerifier;

        assert!(!verifier.verify("hunter2", "not-a-bcrypt-hash"));
        assert!(!verifier.verify("hunter2", ""));
    }
}
