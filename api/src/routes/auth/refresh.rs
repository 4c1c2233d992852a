//! Token refresh handlers for the API and web surfaces.

use actix_web::{web, HttpRequest, HttpResponse};

use sg_core::repositories::SessionStore;
use sg_core::services::session::CredentialVerifier;
use sg_core::services::token::{PresentedCredentials, VerificationPolicy};
use sg_shared::types::MessageResponse;

use crate::dto::auth::{RefreshRequest, TokenResponse};
use crate::handlers::error::handle_domain_error;

use super::cookies::{session_cookies, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use super::{cookie_value, AppState};

/// Handler for POST /v1/auth/api/token/refresh
///
/// The body carries both tokens. The access token is decoded with the
/// expiry check disabled: a refresh call is made precisely because it may
/// already be expired.
///
/// # Errors
/// - 401 Unauthorized: forged/missing credential, stored pair mismatch, or
///   a rotation already claimed by a concurrent request
/// - 500 Internal Server Error: storage failure
pub async fn api_token_refresh<S, V>(
    state: web::Data<AppState<S, V>>,
    body: web::Json<RefreshRequest>,
) -> HttpResponse
where
    S: SessionStore + 'static,
    V: CredentialVerifier + 'static,
{
    let presented =
        PresentedCredentials::pair(body.access_token.clone(), body.refresh_token.clone());
    let token = match state
        .token_verifier
        .verify(VerificationPolicy::LenientBody, &presented)
    {
        Ok(token) => token,
        Err(error) => return handle_domain_error(error.into()),
    };

    match state.session_service.refresh(&token).await {
        Ok(tokens) => HttpResponse::Ok().json(TokenResponse::from(tokens)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /v1/auth/web/token/refresh
///
/// Cookie variant of the refresh flow; on success both cookies are
/// replaced with the rotated pair.
pub async fn web_token_refresh<S, V>(
    state: web::Data<AppState<S, V>>,
    request: HttpRequest,
) -> HttpResponse
where
    S: SessionStore + 'static,
    V: CredentialVerifier + 'static,
{
    let presented = PresentedCredentials::pair(
        cookie_value(&request, ACCESS_TOKEN_COOKIE),
        cookie_value(&request, REFRESH_TOKEN_COOKIE),
    );
    let token = match state
        .token_verifier
        .verify(VerificationPolicy::LenientCookiePair, &presented)
    {
        Ok(token) => token,
        Err(error) => return handle_domain_error(error.into()),
    };

    match state.session_service.refresh(&token).await {
        Ok(tokens) => {
            let (access, refresh) = session_cookies(&tokens.access_token, &tokens.refresh_token);
            HttpResponse::Ok()
                .cookie(access)
                .cookie(refresh)
                .json(MessageResponse::new("refresh success"))
        }
        Err(error) => handle_domain_error(error),
    }
}
