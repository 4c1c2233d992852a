//! Application wiring: shared state re-export and route configuration.

use actix_web::{web, HttpResponse};

use sg_core::repositories::SessionStore;
use sg_core::services::session::CredentialVerifier;
use sg_shared::types::ErrorResponse;

use crate::routes::auth;

pub use crate::routes::auth::AppState;

/// Register every route of the service
///
/// Meant to be plugged into an `App` via `.configure(...)`, both by `main`
/// and by the integration tests.
pub fn configure<S, V>(cfg: &mut web::ServiceConfig)
where
    S: SessionStore + 'static,
    V: CredentialVerifier + 'static,
{
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::scope("/v1/auth")
                .route("/api/login", web::post().to(auth::login::api_login::<S, V>))
                .route("/api/logout", web::post().to(auth::logout::api_logout::<S, V>))
                .route(
                    "/api/token/refresh",
                    web::post().to(auth::refresh::api_token_refresh::<S, V>),
                )
                .route("/web/login", web::post().to(auth::login::web_login::<S, V>))
                .route("/web/logout", web::post().to(auth::logout::web_logout::<S, V>))
                .route(
                    "/web/token/refresh",
                    web::post().to(auth::refresh::web_token_refresh::<S, V>),
                ),
        )
        .default_service(web::route().to(not_found));
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "session-gate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("NOT_FOUND", "Resource not found"))
}
