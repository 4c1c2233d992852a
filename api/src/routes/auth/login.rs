//! Login handlers for the API and web surfaces.

use actix_web::{web, HttpRequest, HttpResponse};

use sg_core::repositories::SessionStore;
use sg_core::services::session::CredentialVerifier;
use sg_shared::types::MessageResponse;

use crate::dto::auth::{LoginRequest, TokenResponse};
use crate::handlers::error::handle_domain_error;

use super::cookies::session_cookies;
use super::{client_ip, AppState};

/// Handler for POST /v1/auth/api/login
///
/// Authenticates the principal and returns the issued pair as JSON.
///
/// # Errors
/// - 401 Unauthorized: unknown email or wrong password
/// - 500 Internal Server Error: storage failure (transaction rolled back)
pub async fn api_login<S, V>(
    state: web::Data<AppState<S, V>>,
    request: HttpRequest,
    body: web::Json<LoginRequest>,
) -> HttpResponse
where
    S: SessionStore + 'static,
    V: CredentialVerifier + 'static,
{
    let login_ip = client_ip(&request);

    match state
        .session_service
        .login(&body.email, &body.password, login_ip.as_deref())
        .await
    {
        Ok(tokens) => HttpResponse::Ok().json(TokenResponse::from(tokens)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /v1/auth/web/login
///
/// Same flow as the API variant, but the pair travels back in two httpOnly
/// cookies instead of the body.
pub async fn web_login<S, V>(
    state: web::Data<AppState<S, V>>,
    request: HttpRequest,
    body: web::Json<LoginRequest>,
) -> HttpResponse
where
    S: SessionStore + 'static,
    V: CredentialVerifier + 'static,
{
    let login_ip = client_ip(&request);

    match state
        .session_service
        .login(&body.email, &body.password, login_ip.as_deref())
        .await
    {
        Ok(tokens) => {
            let (access, refresh) = session_cookies(&tokens.access_token, &tokens.refresh_token);
            HttpResponse::Ok()
                .cookie(access)
                .cookie(refresh)
                .json(MessageResponse::new("login success"))
        }
        Err(error) => handle_domain_error(error),
    }
}
