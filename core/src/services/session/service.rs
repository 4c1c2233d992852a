//! Main session service implementation.

use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use tracing::error;

use crate::domain::entities::token::{IssuedTokens, TokenRecord, TokenRotation, TokenUser};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::{SessionStore, SessionTransaction};
use crate::services::crypto::{AesCipher, KeyedDigest};
use crate::services::token::TokenIssuer;

use super::credentials::CredentialVerifier;

/// Orchestrates the token lifecycle across issuer, crypto, and storage
///
/// Every flow runs inside exactly one transaction: any failure after the
/// first write rolls back all writes of that request before the error
/// surfaces.
pub struct SessionService<S, V>
where
    S: SessionStore,
    V: CredentialVerifier,
{
    /// Session store for transactional persistence
    store: Arc<S>,
    /// Opaque predicate over stored credential material
    credentials: Arc<V>,
    /// Token pair minting
    issuer: TokenIssuer,
    /// Reversible cipher for refresh tokens at rest
    cipher: AesCipher,
    /// Keyed digest for blind indexes
    digest: KeyedDigest,
}

impl<S, V> SessionService<S, V>
where
    S: SessionStore,
    V: CredentialVerifier,
{
    /// Create a new session service
    pub fn new(
        store: Arc<S>,
        credentials: Arc<V>,
        issuer: TokenIssuer,
        cipher: AesCipher,
        digest: KeyedDigest,
    ) -> Self {
        Self {
            store,
            credentials,
            issuer,
            cipher,
            digest,
        }
    }

    /// Authenticate a principal and establish a new session
    ///
    /// This method:
    /// 1. Resolves the principal by the blind index of the email
    /// 2. Checks the password through the opaque credential predicate
    /// 3. Mints an access/refresh pair
    /// 4. Persists the encrypted refresh token with its blind index
    /// 5. Records last-login metadata
    ///
    /// Steps 4 and 5 share one transaction; both succeed or neither does.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        login_ip: Option<&str>,
    ) -> DomainResult<IssuedTokens> {
        let email_key = self.digest.digest(email);

        let mut tx = self.store.begin().await?;
        match self.login_in_tx(&mut tx, &email_key, password, login_ip).await {
            Ok(tokens) => {
                tx.commit().await?;
                Ok(tokens)
            }
            Err(error) => {
                rollback_after(tx, &error).await;
                Err(error)
            }
        }
    }

    async fn login_in_tx(
        &self,
        tx: &mut S::Tx,
        email_key: &str,
        password: &str,
        login_ip: Option<&str>,
    ) -> DomainResult<IssuedTokens> {
        let user = tx
            .find_user_by_email_key(email_key)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if !self.credentials.verify(password, &user.password_hash) {
            return Err(DomainError::Unauthorized);
        }

        let tokens = self.issuer.issue(&user.id.to_string())?;

        let record = TokenRecord {
            user_id: user.id,
            access_token: tokens.access_token.clone(),
            refresh_token: self.cipher.encrypt_str(&tokens.refresh_token)?,
            refresh_token_key: self.digest.digest(&tokens.refresh_token),
            issued_at: tokens.issued_at,
            expires_at: tokens.refresh_expires_at,
        };

        tx.insert_token(&record).await?;
        tx.touch_last_login(user.id, login_ip).await?;

        Ok(tokens)
    }

    /// Tear down the session identified by the verified token user
    ///
    /// An absent record is the recoverable [`TokenError::TokenNotFound`]
    /// outcome, not a fault.
    pub async fn logout(&self, token: &TokenUser) -> DomainResult<()> {
        let user_id = token.user_id()?;

        let mut tx = self.store.begin().await?;
        match Self::logout_in_tx(&mut tx, user_id, &token.access_token).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(error) => {
                rollback_after(tx, &error).await;
                Err(error)
            }
        }
    }

    async fn logout_in_tx(
        tx: &mut S::Tx,
        user_id: i64,
        access_token: &str,
    ) -> DomainResult<()> {
        if !tx.token_exists(user_id, access_token).await? {
            return Err(TokenError::TokenNotFound.into());
        }

        tx.delete_token(user_id, access_token).await?;
        Ok(())
    }

    /// Rotate the presented pair for a fresh one
    ///
    /// This method:
    /// 1. Fetches the stored record by (user, access token)
    /// 2. Decrypts the stored refresh token and compares it byte-for-byte
    ///    against the presented one
    /// 3. Mints a fresh pair
    /// 4. Rewrites the record keyed by the old access token
    ///
    /// Missing record, mismatch, and lost rotation race all collapse into
    /// [`TokenError::CredentialsInvalid`] so a forged request learns
    /// nothing about which part was wrong.
    pub async fn refresh(&self, token: &TokenUser) -> DomainResult<IssuedTokens> {
        let user_id = token.user_id()?;
        let presented_refresh = token
            .refresh_token
            .as_deref()
            .ok_or(TokenError::CredentialsInvalid)?;

        let mut tx = self.store.begin().await?;
        match self
            .refresh_in_tx(&mut tx, user_id, &token.access_token, presented_refresh, &token.sub)
            .await
        {
            Ok(tokens) => {
                tx.commit().await?;
                Ok(tokens)
            }
            Err(error) => {
                rollback_after(tx, &error).await;
                Err(error)
            }
        }
    }

    async fn refresh_in_tx(
        &self,
        tx: &mut S::Tx,
        user_id: i64,
        access_token: &str,
        presented_refresh: &str,
        subject: &str,
    ) -> DomainResult<IssuedTokens> {
        let record = tx
            .find_token(user_id, access_token)
            .await?
            .ok_or(TokenError::CredentialsInvalid)?;

        let stored_refresh = self.cipher.decrypt_str(&record.refresh_token)?;
        if stored_refresh.len() != presented_refresh.len()
            || !constant_time_eq(stored_refresh.as_bytes(), presented_refresh.as_bytes())
        {
            return Err(TokenError::CredentialsInvalid.into());
        }

        let tokens = self.issuer.issue(subject)?;

        let rotation = TokenRotation {
            user_id,
            old_access_token: access_token.to_string(),
            new_access_token: tokens.access_token.clone(),
            refresh_token: self.cipher.encrypt_str(&tokens.refresh_token)?,
            refresh_token_key: self.digest.digest(&tokens.refresh_token),
            expires_at: tokens.refresh_expires_at,
        };

        // A concurrent refresh may have rewritten the row first; the keyed
        // update then matches nothing and this attempt must not succeed.
        if !tx.rotate_token(&rotation).await? {
            return Err(TokenError::CredentialsInvalid.into());
        }

        Ok(tokens)
    }
}

/// Roll back after a failed flow; the original error wins, a rollback
/// failure is only logged
async fn rollback_after<T: SessionTransaction>(tx: T, cause: &DomainError) {
    if let Err(rollback_error) = tx.rollback().await {
        error!(%cause, %rollback_error, "transaction rollback failed");
    }
}
