use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::api::AppState;
use crate::auth::TokenPair;
use crate::domain::errors::AuthError;
use crate::domain::user::{SignupInfo, UserId};

/// Request body for sending an OTP
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub phone: String,
    #[serde(default)]
    pub dial_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub retry_after: u64,
    pub attempt_left: u32,
}

/// Request body for verifying an OTP; carries the signup fields as well
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(flatten)]
    pub signup: SendOtpRequest,
    pub otp: String,
}

impl VerifyOtpRequest {
    fn signup_info(&self) -> SignupInfo {
        SignupInfo {
            phone: self.signup.phone.clone(),
            dial_code: self.signup.dial_code.clone(),
            country: self.signup.country.clone(),
            locale: self.signup.locale.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OAuthRequest {
    pub code: String,
    pub provider: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Token pair as returned to clients
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            refresh_expires_in: pair.refresh_expires_in,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: UserId,
}

/// Send an OTP to a phone number
///
/// POST /api/auth/otp/send
#[instrument(skip_all)]
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, ApiError> {
    let status = state.otp.send(&req.phone).await?;

    Ok(Json(SendOtpResponse {
        retry_after: status.retry_after_seconds,
        attempt_left: status.attempts_left,
    }))
}

/// Verify an OTP and log the user in, creating the account on first use
///
/// POST /api/auth/otp/verify
#[instrument(skip_all)]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    state.otp.verify(&req.signup.phone, &req.otp).await?;

    let pair = state.auth.upsert_user(&req.signup_info()).await?;
    Ok(Json(pair.into()))
}

/// Log in with an OAuth authorization code
///
/// POST /api/auth/oauth
#[instrument(skip_all, fields(provider = %req.provider))]
pub async fn oauth_login(
    State(state): State<AppState>,
    Json(req): Json<OAuthRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let provider = state.oauth_provider(&req.provider).ok_or_else(|| {
        tracing::warn!("oauth provider not configured");
        AuthError::invalid(
            "provider",
            format!("provider '{}' not configured or not supported", req.provider),
        )
    })?;

    let mut user_info = provider.exchange_code(&req.code).await?;
    if let Some(locale) = req.locale.filter(|l| !l.is_empty()) {
        user_info.locale = locale;
    }

    let pair = state.auth.upsert_oauth_user(&user_info).await?;
    Ok(Json(pair.into()))
}

/// Exchange a refresh token for a new token pair
///
/// POST /api/auth/token/refresh
#[instrument(skip_all)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let pair = state.auth.refresh_token(&req.refresh_token).await?;
    Ok(Json(pair.into()))
}

/// Return the authenticated user's id
///
/// GET /api/auth/me
pub async fn me(JwtAuth(user_id): JwtAuth) -> Json<MeResponse> {
    Json(MeResponse { user_id })
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
