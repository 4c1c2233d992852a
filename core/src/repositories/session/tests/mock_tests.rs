use chrono::{Duration, Utc};

use crate::domain::entities::token::{TokenRecord, TokenRotation};
use crate::domain::entities::user::User;
use crate::repositories::session::mock::{MockFailure, MockSessionRepository};
use crate::repositories::session::r#trait::{SessionStore, SessionTransaction};

fn sample_record(user_id: i64, access_token: &str) -> TokenRecord {
    let issued_at = Utc::now();
    TokenRecord {
        user_id,
        access_token: access_token.to_string(),
        refresh_token: "ciphertext".to_string(),
        refresh_token_key: "blind-index".to_string(),
        issued_at,
        expires_at: issued_at + Duration::days(7),
    }
}

#[tokio::test]
async fn test_committed_insert_is_visible() {
    let store = MockSessionRepository::new();

    let mut tx = store.begin().await.unwrap();
    tx.insert_token(&sample_record(42, "access-1")).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(store.token_count().await, 1);
    assert!(store.committed_token(42, "access-1").await.is_some());
}

#[tokio::test]
async fn test_rolled_back_insert_is_invisible() {
    let store = MockSessionRepository::new();

    let mut tx = store.begin().await.unwrap();
    tx.insert_token(&sample_record(42, "access-1")).await.unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(store.token_count().await, 0);
}

#[tokio::test]
async fn test_uncommitted_write_is_invisible_to_other_transactions() {
    let store = MockSessionRepository::new();

    let mut writer = store.begin().await.unwrap();
    writer.insert_token(&sample_record(42, "access-1")).await.unwrap();

    let mut reader = store.begin().await.unwrap();
    assert!(!reader.token_exists(42, "access-1").await.unwrap());

    writer.commit().await.unwrap();
    reader.rollback().await.unwrap();
}

#[tokio::test]
async fn test_rotation_rewrites_the_keyed_row() {
    let store = MockSessionRepository::new();

    let mut tx = store.begin().await.unwrap();
    tx.insert_token(&sample_record(42, "old-access")).await.unwrap();
    tx.commit().await.unwrap();

    let rotation = TokenRotation {
        user_id: 42,
        old_access_token: "old-access".to_string(),
        new_access_token: "new-access".to_string(),
        refresh_token: "new-ciphertext".to_string(),
        refresh_token_key: "new-blind-index".to_string(),
        expires_at: Utc::now() + Duration::days(7),
    };

    let mut tx = store.begin().await.unwrap();
    assert!(tx.rotate_token(&rotation).await.unwrap());
    tx.commit().await.unwrap();

    assert!(store.committed_token(42, "old-access").await.is_none());
    let record = store.committed_token(42, "new-access").await.unwrap();
    assert_eq!(record.refresh_token, "new-ciphertext");
    assert_eq!(record.refresh_token_key, "new-blind-index");
}

#[tokio::test]
async fn test_rotation_of_missing_row_matches_nothing() {
    let store = MockSessionRepository::new();

    let rotation = TokenRotation {
        user_id: 42,
        old_access_token: "already-rotated".to_string(),
        new_access_token: "new-access".to_string(),
        refresh_token: "ciphertext".to_string(),
        refresh_token_key: "blind-index".to_string(),
        expires_at: Utc::now() + Duration::days(7),
    };

    let mut tx = store.begin().await.unwrap();
    assert!(!tx.rotate_token(&rotation).await.unwrap());
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_delete_reports_whether_a_row_matched() {
    let store = MockSessionRepository::new();

    let mut tx = store.begin().await.unwrap();
    tx.insert_token(&sample_record(42, "access-1")).await.unwrap();
    assert!(tx.delete_token(42, "access-1").await.unwrap());
    assert!(!tx.delete_token(42, "access-1").await.unwrap());
    tx.commit().await.unwrap();

    assert_eq!(store.token_count().await, 0);
}

#[tokio::test]
async fn test_seeded_user_is_found_by_email_key() {
    let store = MockSessionRepository::new();
    store.seed_user(User::new(42, "email-key", "hash")).await;

    let mut tx = store.begin().await.unwrap();
    let user = tx.find_user_by_email_key("email-key").await.unwrap().unwrap();
    assert_eq!(user.id, 42);

    assert!(tx.find_user_by_email_key("unknown").await.unwrap().is_none());
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_touch_last_login_updates_metadata_on_commit() {
    let store = MockSessionRepository::new();
    store.seed_user(User::new(42, "email-key", "hash")).await;

    let mut tx = store.begin().await.unwrap();
    tx.touch_last_login(42, Some("203.0.113.9")).await.unwrap();
    tx.commit().await.unwrap();

    let user = store.committed_user(42).await.unwrap();
    assert!(user.last_login_at.is_some());
    assert_eq!(user.last_login_ip.as_deref(), Some("203.0.113.9"));
}

#[tokio::test]
async fn test_injected_failure_surfaces_as_storage_error() {
    let store = MockSessionRepository::with_failure(MockFailure::InsertToken);

    let mut tx = store.begin().await.unwrap();
    let result = tx.insert_token(&sample_record(42, "access-1")).await;
    assert!(result.is_err());
    tx.rollback().await.unwrap();

    assert_eq!(store.token_count().await, 0);
}
