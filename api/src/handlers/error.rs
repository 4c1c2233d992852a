//! Mapping of domain errors onto HTTP responses.

use actix_web::{http::StatusCode, HttpResponse};
use tracing::error;

use sg_core::errors::{DomainError, TokenError};
use sg_shared::types::ErrorResponse;

/// Convert a domain error into the structured HTTP error response
///
/// Authentication failures map to 401, an absent logout/refresh target to
/// 404, and persistence or internal faults to 500. Internal detail is
/// logged, never echoed to the caller.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let (status, code, message) = match &error {
        DomainError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Incorrect username or password.",
        ),
        DomainError::Token(TokenError::CredentialsInvalid) => (
            StatusCode::UNAUTHORIZED,
            "CREDENTIALS_INVALID",
            "Invalid authentication credentials.",
        ),
        DomainError::Token(TokenError::TokenExpired) => (
            StatusCode::UNAUTHORIZED,
            "TOKEN_EXPIRED",
            "Token expired.",
        ),
        DomainError::Token(TokenError::TokenNotFound) => (
            StatusCode::NOT_FOUND,
            "TOKEN_NOT_FOUND",
            "User token not found.",
        ),
        DomainError::Storage(storage_error) => {
            error!("storage failure: {storage_error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "Failed to select/insert data.",
            )
        }
        DomainError::Crypto(crypto_error) => {
            error!("crypto failure: {crypto_error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred.",
            )
        }
        DomainError::Internal { message } => {
            error!("internal error: {message}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred.",
            )
        }
    };

    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}
