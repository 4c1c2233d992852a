//! Token verification policies for the two client transports.

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

use crate::domain::entities::token::{Claims, TokenUser};
use crate::errors::TokenError;

use super::config::TokenConfig;

/// Closed set of verification policies, selected explicitly by the calling
/// flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationPolicy {
    /// `Authorization: Bearer <token>` header; full expiry enforcement; no
    /// refresh token expected
    StrictBearer,

    /// Cookie pair; full expiry enforcement
    StrictCookiePair,

    /// Cookie pair; expiry check disabled on the access token
    LenientCookiePair,

    /// Access/refresh pair submitted in the request body; expiry check
    /// disabled on the access token
    LenientBody,
}

impl VerificationPolicy {
    /// Whether the access token's `exp` claim is enforced
    fn validates_expiry(self) -> bool {
        matches!(self, Self::StrictBearer | Self::StrictCookiePair)
    }

    /// Whether a refresh token must accompany the access token
    fn expects_refresh_token(self) -> bool {
        !matches!(self, Self::StrictBearer)
    }
}

/// Raw credential strings already extracted by the transport boundary
#[derive(Debug, Clone, Default)]
pub struct PresentedCredentials {
    /// Raw `Authorization` header value, if any
    pub authorization: Option<String>,

    /// Access token from a cookie or request body
    pub access_token: Option<String>,

    /// Refresh token from a cookie or request body
    pub refresh_token: Option<String>,
}

impl PresentedCredentials {
    /// Credentials carried in the `Authorization` header
    pub fn bearer(authorization: Option<String>) -> Self {
        Self {
            authorization,
            ..Self::default()
        }
    }

    /// Credentials carried as an access/refresh pair (cookies or body)
    pub fn pair(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
            ..Self::default()
        }
    }
}

/// Decodes and validates presented tokens against the signing key
///
/// The verifier is a per-request state machine with three terminal states:
/// a verified [`TokenUser`], [`TokenError::CredentialsInvalid`], or
/// [`TokenError::TokenExpired`].
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    strict: Validation,
    lenient: Validation,
}

impl TokenVerifier {
    /// Creates a new verifier from configuration
    pub fn new(config: &TokenConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut strict = Validation::new(Algorithm::HS256);
        strict.set_required_spec_claims(&["sub", "exp"]);
        strict.validate_exp = true;
        strict.leeway = 0;

        // A refresh call happens precisely because the access token may
        // already be expired; the claim must still be present and the
        // signature must still hold.
        let mut lenient = strict.clone();
        lenient.validate_exp = false;

        Self {
            decoding_key,
            strict,
            lenient,
        }
    }

    /// Run the verification state machine over one presented credential set
    pub fn verify(
        &self,
        policy: VerificationPolicy,
        presented: &PresentedCredentials,
    ) -> Result<TokenUser, TokenError> {
        let (access_token, refresh_token) = extract(policy, presented)?;

        let validation = if policy.validates_expiry() {
            &self.strict
        } else {
            &self.lenient
        };

        let data =
            decode::<Claims>(&access_token, &self.decoding_key, validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    _ => TokenError::CredentialsInvalid,
                }
            })?;

        Ok(TokenUser {
            sub: data.claims.sub,
            access_token,
            refresh_token,
        })
    }
}

/// Pull the raw token strings the policy requires out of the presented
/// material
fn extract(
    policy: VerificationPolicy,
    presented: &PresentedCredentials,
) -> Result<(String, Option<String>), TokenError> {
    if !policy.expects_refresh_token() {
        let header = presented
            .authorization
            .as_deref()
            .ok_or(TokenError::CredentialsInvalid)?;
        let token = parse_bearer(header).ok_or(TokenError::CredentialsInvalid)?;
        return Ok((token.to_string(), None));
    }

    let access = presented
        .access_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(TokenError::CredentialsInvalid)?;
    let refresh = presented
        .refresh_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(TokenError::CredentialsInvalid)?;

    Ok((access.to_string(), Some(refresh.to_string())))
}

/// Split a `Bearer <token>` header value; the scheme is matched
/// case-insensitively
fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
