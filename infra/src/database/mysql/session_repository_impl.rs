//! MySQL implementation of the session store traits.
//!
//! One [`MySqlSessionTransaction`] wraps one SQLx MySQL transaction, so
//! uncommitted writes stay invisible to other connections until `commit`.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE user (
//!     id             BIGINT PRIMARY KEY AUTO_INCREMENT,
//!     email_key      VARCHAR(64) NOT NULL UNIQUE,
//!     password_hash  VARCHAR(255) NOT NULL,
//!     last_login_at  DATETIME NULL,
//!     last_login_ip  VARCHAR(45) NULL
//! );
//!
//! CREATE TABLE token (
//!     user_id            BIGINT NOT NULL,
//!     access_token       VARCHAR(512) NOT NULL,
//!     refresh_token      TEXT NOT NULL,
//!     refresh_token_key  VARCHAR(64) NOT NULL,
//!     issued_at          DATETIME NOT NULL,
//!     expires_at         DATETIME NOT NULL,
//!     PRIMARY KEY (user_id, access_token)
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Row, Transaction};

use sg_core::domain::entities::token::{TokenRecord, TokenRotation};
use sg_core::domain::entities::user::User;
use sg_core::errors::StorageError;
use sg_core::repositories::{SessionStore, SessionTransaction};

/// MySQL-backed session store
pub struct MySqlSessionRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    /// Create a new MySQL session repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// One open MySQL transaction
pub struct MySqlSessionTransaction {
    tx: Transaction<'static, MySql>,
}

fn storage_error(context: &str, error: sqlx::Error) -> StorageError {
    StorageError::new(format!("{context}: {error}"))
}

/// Convert a database row to a User entity
fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, StorageError> {
    Ok(User {
        id: row
            .try_get("id")
            .map_err(|e| storage_error("failed to get id", e))?,
        email_key: row
            .try_get("email_key")
            .map_err(|e| storage_error("failed to get email_key", e))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| storage_error("failed to get password_hash", e))?,
        last_login_at: row
            .try_get::<Option<DateTime<Utc>>, _>("last_login_at")
            .map_err(|e| storage_error("failed to get last_login_at", e))?,
        last_login_ip: row
            .try_get("last_login_ip")
            .map_err(|e| storage_error("failed to get last_login_ip", e))?,
    })
}

/// Convert a database row to a TokenRecord entity
fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<TokenRecord, StorageError> {
    Ok(TokenRecord {
        user_id: row
            .try_get("user_id")
            .map_err(|e| storage_error("failed to get user_id", e))?,
        access_token: row
            .try_get("access_token")
            .map_err(|e| storage_error("failed to get access_token", e))?,
        refresh_token: row
            .try_get("refresh_token")
            .map_err(|e| storage_error("failed to get refresh_token", e))?,
        refresh_token_key: row
            .try_get("refresh_token_key")
            .map_err(|e| storage_error("failed to get refresh_token_key", e))?,
        issued_at: row
            .try_get::<DateTime<Utc>, _>("issued_at")
            .map_err(|e| storage_error("failed to get issued_at", e))?,
        expires_at: row
            .try_get::<DateTime<Utc>, _>("expires_at")
            .map_err(|e| storage_error("failed to get expires_at", e))?,
    })
}

#[async_trait]
impl SessionStore for MySqlSessionRepository {
    type Tx = MySqlSessionTransaction;

    async fn begin(&self) -> Result<Self::Tx, StorageError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("failed to begin transaction", e))?;
        Ok(MySqlSessionTransaction { tx })
    }
}

#[async_trait]
impl SessionTransaction for MySqlSessionTransaction {
    async fn find_user_by_email_key(
        &mut self,
        email_key: &str,
    ) -> Result<Option<User>, StorageError> {
        let query = r#"
            SELECT id, email_key, password_hash, last_login_at, last_login_ip
            FROM user
            WHERE email_key = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(email_key)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| storage_error("failed to find user", e))?;

        match result {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn touch_last_login(
        &mut self,
        user_id: i64,
        login_ip: Option<&str>,
    ) -> Result<(), StorageError> {
        let query = r#"
            UPDATE user
            SET last_login_at = ?, last_login_ip = ?
            WHERE id = ?
        "#;

        sqlx::query(query)
            .bind(Utc::now())
            .bind(login_ip)
            .bind(user_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| storage_error("failed to update last login", e))?;

        Ok(())
    }

    async fn token_exists(
        &mut self,
        user_id: i64,
        access_token: &str,
    ) -> Result<bool, StorageError> {
        let query = r#"
            SELECT COUNT(*) AS cnt
            FROM token
            WHERE user_id = ? AND access_token = ?
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(access_token)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| storage_error("failed to check token existence", e))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| storage_error("failed to get existence count", e))?;

        Ok(count > 0)
    }

    async fn find_token(
        &mut self,
        user_id: i64,
        access_token: &str,
    ) -> Result<Option<TokenRecord>, StorageError> {
        let query = r#"
            SELECT user_id, access_token, refresh_token, refresh_token_key, issued_at, expires_at
            FROM token
            WHERE user_id = ? AND access_token = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(access_token)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| storage_error("failed to find token", e))?;

        match result {
            Some(row) => Ok(Some(row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert_token(&mut self, record: &TokenRecord) -> Result<(), StorageError> {
        let query = r#"
            INSERT INTO token (
                user_id, access_token, refresh_token, refresh_token_key, issued_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.user_id)
            .bind(&record.access_token)
            .bind(&record.refresh_token)
            .bind(&record.refresh_token_key)
            .bind(record.issued_at)
            .bind(record.expires_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| storage_error("failed to insert token", e))?;

        Ok(())
    }

    async fn rotate_token(&mut self, rotation: &TokenRotation) -> Result<bool, StorageError> {
        // Single atomic statement keyed by the old access token: at most one
        // concurrent rotation can match the row.
        let query = r#"
            UPDATE token
            SET access_token = ?, refresh_token = ?, refresh_token_key = ?, expires_at = ?
            WHERE user_id = ? AND access_token = ?
        "#;

        let result = sqlx::query(query)
            .bind(&rotation.new_access_token)
            .bind(&rotation.refresh_token)
            .bind(&rotation.refresh_token_key)
            .bind(rotation.expires_at)
            .bind(rotation.user_id)
            .bind(&rotation.old_access_token)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| storage_error("failed to rotate token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_token(
        &mut self,
        user_id: i64,
        access_token: &str,
    ) -> Result<bool, StorageError> {
        let query = r#"
            DELETE FROM token
            WHERE user_id = ? AND access_token = ?
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(access_token)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| storage_error("failed to delete token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self) -> Result<(), StorageError> {
        self.tx
            .commit()
            .await
            .map_err(|e| storage_error("failed to commit transaction", e))
    }

    async fn rollback(self) -> Result<(), StorageError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| storage_error("failed to roll back transaction", e))
    }
}
