//! Session cookie construction for the web flows.

use actix_web::cookie::{time::Duration, Cookie};

pub(super) const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub(super) const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Build the httpOnly pair carrying a freshly issued token pair
pub(super) fn session_cookies(
    access_token: &str,
    refresh_token: &str,
) -> (Cookie<'static>, Cookie<'static>) {
    let access = Cookie::build(ACCESS_TOKEN_COOKIE, access_token.to_string())
        .path("/")
        .http_only(true)
        .finish();

    let refresh = Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
        .path("/")
        .http_only(true)
        .finish();

    (access, refresh)
}

/// Build removal cookies: empty value, immediate expiry
pub(super) fn clear_session_cookies() -> (Cookie<'static>, Cookie<'static>) {
    let access = Cookie::build(ACCESS_TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .finish();

    let refresh = Cookie::build(REFRESH_TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .finish();

    (access, refresh)
}
