//! Session store traits defining the persistence contract for token
//! records and principal lookups.

use async_trait::async_trait;

use crate::domain::entities::token::{TokenRecord, TokenRotation};
use crate::domain::entities::user::User;
use crate::errors::StorageError;

/// Factory for transaction-scoped units of work
///
/// Every inbound request runs against exactly one transaction; uncommitted
/// writes must be invisible to other transactions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Transaction type produced by [`begin`](Self::begin)
    type Tx: SessionTransaction;

    /// Open a new transaction
    async fn begin(&self) -> Result<Self::Tx, StorageError>;
}

/// One transaction-scoped unit of work over users and token records
///
/// Operations surface storage failures as [`StorageError`] and never
/// interpret business meaning: an absent row is a normal empty result, not
/// an error.
#[async_trait]
pub trait SessionTransaction: Send {
    /// Resolve a principal by the blind index of their email
    async fn find_user_by_email_key(
        &mut self,
        email_key: &str,
    ) -> Result<Option<User>, StorageError>;

    /// Record last-login metadata for a principal
    async fn touch_last_login(
        &mut self,
        user_id: i64,
        login_ip: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Existence probe by the natural (user, access token) key
    async fn token_exists(
        &mut self,
        user_id: i64,
        access_token: &str,
    ) -> Result<bool, StorageError>;

    /// Fetch a token record for comparison during refresh
    async fn find_token(
        &mut self,
        user_id: i64,
        access_token: &str,
    ) -> Result<Option<TokenRecord>, StorageError>;

    /// Insert a freshly issued token record (login)
    ///
    /// The refresh-token ciphertext and blind index are precomputed by the
    /// caller.
    async fn insert_token(&mut self, record: &TokenRecord) -> Result<(), StorageError>;

    /// Atomically rewrite the record keyed by the old access token
    /// (rotation)
    ///
    /// Returns `false` when no row matched, i.e. the old access token was
    /// already rotated away by a concurrent refresh.
    async fn rotate_token(&mut self, rotation: &TokenRotation) -> Result<bool, StorageError>;

    /// Delete the record for the given pair (logout)
    ///
    /// Returns `false` when no row matched.
    async fn delete_token(
        &mut self,
        user_id: i64,
        access_token: &str,
    ) -> Result<bool, StorageError>;

    /// Commit every write performed through this transaction
    async fn commit(self) -> Result<(), StorageError>;

    /// Discard every write performed through this transaction
    async fn rollback(self) -> Result<(), StorageError>;
}
