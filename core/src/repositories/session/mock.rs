//! In-memory implementation of the session store for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::token::{TokenRecord, TokenRotation};
use crate::domain::entities::user::User;
use crate::errors::StorageError;

use super::r#trait::{SessionStore, SessionTransaction};

/// Which operation an injected failure should hit, for rollback-path tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    InsertToken,
    RotateToken,
    DeleteToken,
    TouchLastLogin,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct MockState {
    users: Vec<User>,
    tokens: HashMap<(i64, String), TokenRecord>,
}

/// In-memory session store
///
/// A transaction clones the committed state at `begin` and writes its
/// working copy back on `commit`, so rollback and write isolation behave
/// like the real store.
pub struct MockSessionRepository {
    state: Arc<Mutex<MockState>>,
    failure: Option<MockFailure>,
}

impl MockSessionRepository {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            failure: None,
        }
    }

    /// Create a mock store that fails on the given operation
    pub fn with_failure(failure: MockFailure) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            failure: Some(failure),
        }
    }

    /// Seed a user directly into committed state
    pub async fn seed_user(&self, user: User) {
        self.state.lock().await.users.push(user);
    }

    /// Number of committed token records
    pub async fn token_count(&self) -> usize {
        self.state.lock().await.tokens.len()
    }

    /// Committed token record for a (user, access token) pair, if any
    pub async fn committed_token(&self, user_id: i64, access_token: &str) -> Option<TokenRecord> {
        self.state
            .lock()
            .await
            .tokens
            .get(&(user_id, access_token.to_string()))
            .cloned()
    }

    /// Committed user row, if any
    pub async fn committed_user(&self, user_id: i64) -> Option<User> {
        self.state
            .lock()
            .await
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
    }
}

impl Default for MockSessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// One open mock transaction holding a working copy of the state
pub struct MockSessionTransaction {
    shared: Arc<Mutex<MockState>>,
    working: MockState,
    failure: Option<MockFailure>,
}

impl MockSessionTransaction {
    fn fail_if(&self, op: MockFailure) -> Result<(), StorageError> {
        if self.failure == Some(op) {
            return Err(StorageError::new("injected mock failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MockSessionRepository {
    type Tx = MockSessionTransaction;

    async fn begin(&self) -> Result<Self::Tx, StorageError> {
        let working = self.state.lock().await.clone();
        Ok(MockSessionTransaction {
            shared: Arc::clone(&self.state),
            working,
            failure: self.failure,
        })
    }
}

#[async_trait]
impl SessionTransaction for MockSessionTransaction {
    async fn find_user_by_email_key(
        &mut self,
        email_key: &str,
    ) -> Result<Option<User>, StorageError> {
        Ok(self
            .working
            .users
            .iter()
            .find(|u| u.email_key == email_key)
            .cloned())
    }

    async fn touch_last_login(
        &mut self,
        user_id: i64,
        login_ip: Option<&str>,
    ) -> Result<(), StorageError> {
        self.fail_if(MockFailure::TouchLastLogin)?;

        if let Some(user) = self.working.users.iter_mut().find(|u| u.id == user_id) {
            user.last_login_at = Some(Utc::now());
            user.last_login_ip = login_ip.map(str::to_string);
        }
        Ok(())
    }

    async fn token_exists(
        &mut self,
        user_id: i64,
        access_token: &str,
    ) -> Result<bool, StorageError> {
        Ok(self
            .working
            .tokens
            .contains_key(&(user_id, access_token.to_string())))
    }

    async fn find_token(
        &mut self,
        user_id: i64,
        access_token: &str,
    ) -> Result<Option<TokenRecord>, StorageError> {
        Ok(self
            .working
            .tokens
            .get(&(user_id, access_token.to_string()))
            .cloned())
    }

    async fn insert_token(&mut self, record: &TokenRecord) -> Result<(), StorageError> {
        self.fail_if(MockFailure::InsertToken)?;

        self.working.tokens.insert(
            (record.user_id, record.access_token.clone()),
            record.clone(),
        );
        Ok(())
    }

    async fn rotate_token(&mut self, rotation: &TokenRotation) -> Result<bool, StorageError> {
        self.fail_if(MockFailure::RotateToken)?;

        let old_key = (rotation.user_id, rotation.old_access_token.clone());
        let Some(old_record) = self.working.tokens.remove(&old_key) else {
            return Ok(false);
        };

        let record = TokenRecord {
            user_id: rotation.user_id,
            access_token: rotation.new_access_token.clone(),
            refresh_token: rotation.refresh_token.clone(),
            refresh_token_key: rotation.refresh_token_key.clone(),
            issued_at: old_record.issued_at,
            expires_at: rotation.expires_at,
        };
        self.working
            .tokens
            .insert((rotation.user_id, rotation.new_access_token.clone()), record);
        Ok(true)
    }

    async fn delete_token(
        &mut self,
        user_id: i64,
        access_token: &str,
    ) -> Result<bool, StorageError> {
        self.fail_if(MockFailure::DeleteToken)?;

        Ok(self
            .working
            .tokens
            .remove(&(user_id, access_token.to_string()))
            .is_some())
    }

    async fn commit(self) -> Result<(), StorageError> {
        self.fail_if(MockFailure::Commit)?;

        *self.shared.lock().await = self.working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        // Working copy is simply dropped
        Ok(())
    }
}
