//! Bearer-token extractor for protected routes.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::session::SessionError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// Authenticated user id, taken from the token's `sub` claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

/// Pull the token out of an `Authorization: Bearer <token>` value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AppError::Unauthorized(SessionError::MissingToken))?;

        let claims = state
            .session_manager
            .validate_token(token)
            .map_err(AppError::Unauthorized)?;

        Ok(AuthUser(claims.sub))
    }
}
