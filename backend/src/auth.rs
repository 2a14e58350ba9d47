//! Bearer-token authentication
//!
//! Verifies HS256 JWTs against the shared secret and exposes the `sub`
//! claim as the caller's user id through the [`AuthUser`] extractor.
//! Audience is not checked and a 60 second clock skew is tolerated, which
//! matches tokens issued by Supabase.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Allowed clock skew when checking `exp` / `nbf`
pub const TOKEN_LEEWAY_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
}

/// Authenticated caller, identified by the token's `sub` claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer(header: Option<&HeaderValue>) -> Option<String> {
    let value = header?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Verify `token` with `secret` and return the user id
pub fn verify_token(token: &str, secret: &str) -> Result<String, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    validation.leeway = TOKEN_LEEWAY_SECS;
    // exp is still checked when present
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::Unauthorized("token expired".to_string()),
        ErrorKind::InvalidSignature => AppError::Unauthorized(
            "invalid token signature; check that JWT_SECRET matches the issuer's secret"
                .to_string(),
        ),
        _ => AppError::Unauthorized(format!("invalid token: {}", e)),
    })?;

    data.claims
        .sub
        .filter(|sub| !sub.is_empty())
        .ok_or_else(|| AppError::Unauthorized("invalid token: missing sub".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts.headers.get(header::AUTHORIZATION))
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let secret = state.auth.jwt_secret.as_deref().ok_or_else(|| {
            AppError::Misconfigured("JWT_SECRET (or SUPABASE_JWT_SECRET) is not set".to_string())
        })?;

        let user_id = verify_token(&token, secret)?;
        tracing::debug!(user_id = %user_id, "Authenticated request");
        Ok(AuthUser(user_id))
    }
}
