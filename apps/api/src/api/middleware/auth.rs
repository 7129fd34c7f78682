use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::auth::jwt::TokenService;
use crate::domain::errors::AuthError;
use crate::domain::user::UserId;

/// JWT authentication extractor for protected routes
///
/// Accepts only access tokens; a refresh token fails the audience check.
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(
///     JwtAuth(user_id): JwtAuth,
/// ) -> Result<String, ApiError> {
///     Ok(format!("Hello user {}", user_id))
/// }
/// ```
pub struct JwtAuth(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for JwtAuth
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| deny("Authorization header is missing"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| deny("Invalid Authorization header format"))?;

        let tokens = Arc::<TokenService>::from_ref(state);
        let claims = tokens
            .verify_token(token)
            .map_err(|_| deny("Invalid token"))?;
        let subject = tokens
            .validate_access_claims(&claims)
            .map_err(|e| deny(e.to_string()))?;
        let user_id = subject
            .parse::<UserId>()
            .map_err(|_| deny("Invalid token subject"))?;

        Ok(JwtAuth(user_id))
    }
}

fn deny(reason: impl Into<String>) -> ApiError {
    AuthError::Permission(reason.into()).into()
}
