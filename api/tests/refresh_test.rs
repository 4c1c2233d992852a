//! Integration tests for the token refresh endpoints

use actix_web::cookie::Cookie;
use actix_web::{http::StatusCode, test, web, App};
use std::sync::Arc;

use sg_api::app::{configure, AppState};
use sg_core::domain::entities::token::IssuedTokens;
use sg_core::domain::entities::user::User;
use sg_core::repositories::MockSessionRepository;
use sg_core::services::crypto::{AesCipher, KeyedDigest};
use sg_core::services::session::SessionService;
use sg_core::services::token::{TokenConfig, TokenIssuer, TokenVerifier};
use sg_infra::auth::BcryptVerifier;

const JWT_SECRET: &str = "test-jwt-secret";
const CIPHER_SECRET: &str = "test-cipher-secret";
const DIGEST_SECRET: &str = "test-digest-secret";

const EMAIL: &str = "user@example.com";
const PASSWORD: &str = "hunter2";

fn token_config() -> TokenConfig {
    TokenConfig {
        jwt_secret: JWT_SECRET.to_string(),
        access_token_expiry_minutes: 10,
        refresh_token_expiry_days: 7,
    }
}

/// App state over the in-memory store, seeded with user 42
async fn seeded_state(
    config: TokenConfig,
) -> (
    web::Data<AppState<MockSessionRepository, BcryptVerifier>>,
    Arc<MockSessionRepository>,
) {
    let store = Arc::new(MockSessionRepository::new());
    let digest = KeyedDigest::new(DIGEST_SECRET);
    let password_hash = bcrypt::hash(PASSWORD, 4).unwrap();
    store
        .seed_user(User::new(42, digest.digest(EMAIL), password_hash))
        .await;

    let session_service = Arc::new(SessionService::new(
        Arc::clone(&store),
        Arc::new(BcryptVerifier),
        TokenIssuer::new(config.clone()),
        AesCipher::new(CIPHER_SECRET),
        KeyedDigest::new(DIGEST_SECRET),
    ));
    let token_verifier = Arc::new(TokenVerifier::new(&config));

    let state = web::Data::new(AppState {
        session_service,
        token_verifier,
    });
    (state, store)
}

/// Establish a session directly through the service layer
async fn login(
    state: &web::Data<AppState<MockSessionRepository, BcryptVerifier>>,
) -> IssuedTokens {
    state
        .session_service
        .login(EMAIL, PASSWORD, None)
        .await
        .unwrap()
}

#[actix_web::test]
async fn test_api_refresh_rotates_pair() {
    let (state, store) = seeded_state(token_config()).await;
    let old = login(&state).await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure::<MockSessionRepository, BcryptVerifier>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/auth/api/token/refresh")
        .set_json(serde_json::json!({
            "access_token": old.access_token,
            "refresh_token": old.refresh_token,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let new_access = body["access_token"].as_str().unwrap();
    let new_refresh = body["refresh_token"].as_str().unwrap();
    assert_ne!(new_access, old.access_token);
    assert_ne!(new_refresh, old.refresh_token);

    // The old key is gone; the new one owns the single record
    assert!(store.committed_token(42, &old.access_token).await.is_none());
    assert!(store.committed_token(42, new_access).await.is_some());
    assert_eq!(store.token_count().await, 1);
}

#[actix_web::test]
async fn test_api_refresh_replay_of_rotated_pair_is_unauthorized() {
    let (state, _store) = seeded_state(token_config()).await;
    let old = login(&state).await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure::<MockSessionRepository, BcryptVerifier>),
    )
    .await;

    let body = serde_json::json!({
        "access_token": old.access_token,
        "refresh_token": old.refresh_token,
    });

    let req = test::TestRequest::post()
        .uri("/v1/auth/api/token/refresh")
        .set_json(body.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The rotated-away pair must not refresh a second time
    let req = test::TestRequest::post()
        .uri("/v1/auth/api/token/refresh")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CREDENTIALS_INVALID");
}

#[actix_web::test]
async fn test_api_refresh_with_mismatched_refresh_token_is_unauthorized() {
    let (state, store) = seeded_state(token_config()).await;
    let tokens = login(&state).await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure::<MockSessionRepository, BcryptVerifier>),
    )
    .await;

    let before = store.committed_token(42, &tokens.access_token).await.unwrap();

    let req = test::TestRequest::post()
        .uri("/v1/auth/api/token/refresh")
        .set_json(serde_json::json!({
            "access_token": tokens.access_token,
            "refresh_token": "not-the-stored-refresh-token",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // No storage mutation on mismatch
    let after = store.committed_token(42, &tokens.access_token).await.unwrap();
    assert_eq!(before, after);
}

#[actix_web::test]
async fn test_api_refresh_with_expired_access_token_succeeds() {
    // Access tokens from this config are already expired when minted; the
    // lenient policy must still accept them
    let (state, store) = seeded_state(TokenConfig {
        access_token_expiry_minutes: -5,
        ..token_config()
    })
    .await;
    let old = login(&state).await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure::<MockSessionRepository, BcryptVerifier>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/auth/api/token/refresh")
        .set_json(serde_json::json!({
            "access_token": old.access_token,
            "refresh_token": old.refresh_token,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let new_access = body["access_token"].as_str().unwrap();
    assert!(store.committed_token(42, new_access).await.is_some());
}

#[actix_web::test]
async fn test_api_refresh_with_forged_access_token_is_unauthorized() {
    let (state, _store) = seeded_state(token_config()).await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure::<MockSessionRepository, BcryptVerifier>),
    )
    .await;

    let forged = TokenIssuer::new(TokenConfig {
        jwt_secret: "attacker-controlled-secret".to_string(),
        ..token_config()
    })
    .issue("42")
    .unwrap();

    let req = test::TestRequest::post()
        .uri("/v1/auth/api/token/refresh")
        .set_json(serde_json::json!({
            "access_token": forged.access_token,
            "refresh_token": forged.refresh_token,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_api_refresh_with_empty_body_is_unauthorized() {
    let (state, _store) = seeded_state(token_config()).await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure::<MockSessionRepository, BcryptVerifier>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/auth/api/token/refresh")
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_web_refresh_sets_rotated_cookies() {
    let (state, store) = seeded_state(token_config()).await;
    let old = login(&state).await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure::<MockSessionRepository, BcryptVerifier>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/auth/web/token/refresh")
        .cookie(Cookie::new("access_token", old.access_token.clone()))
        .cookie(Cookie::new("refresh_token", old.refresh_token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let cookies: Vec<_> = resp.response().cookies().collect();
    let access = cookies.iter().find(|c| c.name() == "access_token").unwrap();
    let refresh = cookies.iter().find(|c| c.name() == "refresh_token").unwrap();
    assert_eq!(access.http_only(), Some(true));
    assert_ne!(access.value(), old.access_token);
    assert_ne!(refresh.value(), old.refresh_token);
    assert!(store.committed_token(42, access.value()).await.is_some());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "refresh success");
}
