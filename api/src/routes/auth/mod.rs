//! Authentication route handlers
//!
//! Two surfaces share the same flows: API clients carry tokens in the
//! `Authorization` header or the request body, web clients in a pair of
//! httpOnly cookies.

pub mod login;
pub mod logout;
pub mod refresh;

mod cookies;

use std::sync::Arc;

use actix_web::{http::header, HttpRequest};

use sg_core::repositories::SessionStore;
use sg_core::services::session::{CredentialVerifier, SessionService};
use sg_core::services::token::TokenVerifier;

/// Shared state handed to every auth handler
pub struct AppState<S, V>
where
    S: SessionStore,
    V: CredentialVerifier,
{
    pub session_service: Arc<SessionService<S, V>>,
    pub token_verifier: Arc<TokenVerifier>,
}

/// Raw `Authorization` header value, if present and readable
pub(super) fn authorization_header(request: &HttpRequest) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Raw cookie value by name, if present
pub(super) fn cookie_value(request: &HttpRequest, name: &str) -> Option<String> {
    request.cookie(name).map(|cookie| cookie.value().to_string())
}

/// Peer address of the client, used for last-login bookkeeping
pub(super) fn client_ip(request: &HttpRequest) -> Option<String> {
    request.peer_addr().map(|addr| addr.ip().to_string())
}
