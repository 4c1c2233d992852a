//! Logout handlers for the API and web surfaces.

use actix_web::{web, HttpRequest, HttpResponse};

use sg_core::repositories::SessionStore;
use sg_core::services::session::CredentialVerifier;
use sg_core::services::token::{PresentedCredentials, VerificationPolicy};
use sg_shared::types::MessageResponse;

use crate::handlers::error::handle_domain_error;

use super::cookies::{clear_session_cookies, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use super::{authorization_header, cookie_value, AppState};

/// Handler for POST /v1/auth/api/logout
///
/// Requires a well-formed `Authorization: Bearer <token>` header with a
/// fresh access token.
///
/// # Errors
/// - 401 Unauthorized: missing/malformed/expired credential
/// - 404 Not Found: no stored record for the presented pair
/// - 500 Internal Server Error: storage failure
pub async fn api_logout<S, V>(
    state: web::Data<AppState<S, V>>,
    request: HttpRequest,
) -> HttpResponse
where
    S: SessionStore + 'static,
    V: CredentialVerifier + 'static,
{
    let presented = PresentedCredentials::bearer(authorization_header(&request));
    let token = match state
        .token_verifier
        .verify(VerificationPolicy::StrictBearer, &presented)
    {
        Ok(token) => token,
        Err(error) => return handle_domain_error(error.into()),
    };

    match state.session_service.logout(&token).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("logout success")),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /v1/auth/web/logout
///
/// Requires the httpOnly cookie pair with a fresh access token. On success
/// both cookies are cleared.
pub async fn web_logout<S, V>(
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
        .verify(VerificationPolicy::StrictCookiePair, &presented)
    {
        Ok(token) => token,
        Err(error) => return handle_domain_error(error.into()),
    };

    match state.session_service.logout(&token).await {
        Ok(()) => {
            let (access, refresh) = clear_session_cookies();
            HttpResponse::Ok()
                .cookie(access)
                .cookie(refresh)
                .json(MessageResponse::new("logout success"))
        }
        Err(error) => handle_domain_error(error),
    }
}
