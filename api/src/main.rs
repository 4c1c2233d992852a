//! SessionGate API server entry point.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use sg_api::app::{self, AppState};
use sg_api::config::AppConfig;
use sg_core::services::crypto::{AesCipher, KeyedDigest};
use sg_core::services::session::SessionService;
use sg_core::services::token::{TokenConfig, TokenIssuer, TokenVerifier};
use sg_infra::auth::BcryptVerifier;
use sg_infra::database::{create_pool, MySqlSessionRepository};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    if config.auth.is_using_default_secrets() {
        warn!("running with development placeholder secrets");
    }

    info!("Starting SessionGate API server");

    let pool = create_pool(&config.database).await?;
    let store = Arc::new(MySqlSessionRepository::new(pool));

    let token_config = TokenConfig::from(&config.auth);
    let session_service = Arc::new(SessionService::new(
        store,
        Arc::new(BcryptVerifier),
        TokenIssuer::new(token_config.clone()),
        AesCipher::new(&config.auth.cipher_secret),
        KeyedDigest::new(&config.auth.digest_secret),
    ));
    let token_verifier = Arc::new(TokenVerifier::new(&token_config));

    let state = web::Data::new(AppState {
        session_service,
        token_verifier,
    });

    let bind_address = config.server.bind_address();
    info!("Server listening on {bind_address}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .configure(app::configure::<MySqlSessionRepository, BcryptVerifier>)
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
