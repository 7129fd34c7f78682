// JWT access/refresh token creation and verification
//
// Both token kinds share one HMAC key and one claim shape; the audience is
// the only thing that tells them apart.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Purpose a token was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Access token, presented on authenticated requests
    Login,
    /// Refresh token, exchanged for a new token pair
    Refresh,
}

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (stringified user id)
/// * `aud` - Token purpose
/// * `iat` - Issued-at (seconds since epoch)
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aud: Audience,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("expired token")]
    Expired,

    #[error("invalid token audience")]
    InvalidAudience,

    #[error("invalid token claims")]
    InvalidClaims,

    #[error("unexpected signing method")]
    UnexpectedAlgorithm,

    #[error("failed to parse token: {0}")]
    Malformed(String),

    #[error("unable to generate jwt token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnexpectedAlgorithm
            }
            ErrorKind::MissingRequiredClaim(_) => TokenError::InvalidClaims,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Mints and validates signed claims with a single symmetric key
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_validity: i64,
    refresh_validity: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Any HMAC variant is accepted; asymmetric or unsigned headers are not
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        // Audience is checked by validate_*_claims against the closed enum
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            validation,
            access_validity: config.access_token_validity_seconds,
            refresh_validity: config.refresh_token_validity_seconds,
        }
    }

    pub fn access_validity_seconds(&self) -> i64 {
        self.access_validity
    }

    pub fn refresh_validity_seconds(&self) -> i64 {
        self.refresh_validity
    }

    pub fn new_access_claims(&self, subject: &str) -> Claims {
        Self::claims(subject, Audience::Login, self.access_validity)
    }

    pub fn new_refresh_claims(&self, subject: &str) -> Claims {
        Self::claims(subject, Audience::Refresh, self.refresh_validity)
    }

    fn claims(subject: &str, aud: Audience, validity_seconds: i64) -> Claims {
        let iat = Utc::now().timestamp();
        Claims {
            sub: subject.to_string(),
            aud,
            iat,
            exp: iat.saturating_add(validity_seconds),
        }
    }

    /// Signs claims into a compact HS256 token
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature, algorithm family and expiry
    ///
    /// The returned claims have not been checked for audience; pass them to
    /// [`validate_access_claims`](Self::validate_access_claims) or
    /// [`validate_refresh_claims`](Self::validate_refresh_claims).
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// Returns the subject of a valid access token
    pub fn validate_access_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        Self::validate(claims, Audience::Login)
    }

    /// Returns the subject of a valid refresh token
    pub fn validate_refresh_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        Self::validate(claims, Audience::Refresh)
    }

    fn validate(claims: &Claims, expected: Audience) -> Result<String, TokenError> {
        if claims.is_expired() {
            return Err(TokenError::Expired);
        }
        if claims.sub.is_empty() {
            return Err(TokenError::InvalidClaims);
        }
        if claims.aud != expected {
            return Err(TokenError::InvalidAudience);
        }
        Ok(claims.sub.clone())
    }
}
