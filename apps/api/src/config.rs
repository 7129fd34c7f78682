// Service configuration loaded from environment variables

use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// OTP code sent to the configured test phone
pub const DEFAULT_TEST_CODE: &str = "000000";

/// Upper bound for every validity and retry window, ten years
pub const MAX_DURATION_SECONDS: u32 = 10 * 365 * 24 * 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Token signing and validity settings
#[derive(Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub access_token_validity_seconds: i64,
    pub refresh_token_validity_seconds: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"[REDACTED]")
            .field(
                "access_token_validity_seconds",
                &self.access_token_validity_seconds,
            )
            .field(
                "refresh_token_validity_seconds",
                &self.refresh_token_validity_seconds,
            )
            .finish()
    }
}

/// OTP issuance limits
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Number of digits in a generated code
    pub length: usize,
    pub max_attempts: u32,
    pub retry_after_seconds: u64,
    pub validity_seconds: u64,
    /// Phone that always receives `test_code` and never triggers a dispatch
    pub test_phone: Option<String>,
    pub test_code: String,
}

impl OtpConfig {
    pub fn validity(&self) -> Duration {
        Duration::from_secs(self.validity_seconds)
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            length: 6,
            max_attempts: 3,
            retry_after_seconds: 30,
            validity_seconds: 300,
            test_phone: None,
            test_code: DEFAULT_TEST_CODE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub bind_address: String,
    pub auth: AuthConfig,
    pub otp: OtpConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = required(vars, "DATABASE_URL")?;
        let redis_url = vars.get("REDIS_URL").filter(|v| !v.is_empty()).cloned();
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let secret_key = required(vars, "JWT_SECRET")?;
        if secret_key.trim().is_empty() {
            return Err(invalid("JWT_SECRET", "must not be empty"));
        }

        let auth = AuthConfig {
            secret_key,
            access_token_validity_seconds: seconds(vars, "ACCESS_TOKEN_VALIDITY_SECONDS", 3600)?,
            refresh_token_validity_seconds: seconds(
                vars,
                "REFRESH_TOKEN_VALIDITY_SECONDS",
                30 * 24 * 3600,
            )?,
        };

        let defaults = OtpConfig::default();
        let test_code = vars
            .get("OTP_TEST_CODE")
            .cloned()
            .unwrap_or(defaults.test_code);
        if test_code.is_empty() || !test_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("OTP_TEST_CODE", "must contain only digits"));
        }

        let otp = OtpConfig {
            length: positive(vars, "OTP_LENGTH", defaults.length)?,
            max_attempts: positive(vars, "OTP_MAX_ATTEMPTS", defaults.max_attempts)?,
            retry_after_seconds: seconds(
                vars,
                "OTP_RETRY_AFTER_SECONDS",
                defaults.retry_after_seconds,
            )?,
            validity_seconds: seconds(vars, "OTP_VALIDITY_SECONDS", defaults.validity_seconds)?,
            test_phone: vars.get("OTP_TEST_PHONE").filter(|v| !v.is_empty()).cloned(),
            test_code,
        };

        Ok(Config {
            database_url,
            redis_url,
            bind_address,
            auth,
            otp,
        })
    }
}

fn required(vars: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    vars.get(name)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn invalid(name: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Parse an optional numeric variable that must be greater than zero
fn positive<T>(vars: &HashMap<String, String>, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let value = match vars.get(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| invalid(name, e.to_string()))?,
        None => default,
    };
    if value <= T::default() {
        return Err(invalid(name, "must be greater than zero"));
    }
    Ok(value)
}

/// Parse a positive duration in seconds no larger than [`MAX_DURATION_SECONDS`]
fn seconds<T>(vars: &HashMap<String, String>, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default + From<u32>,
    T::Err: std::fmt::Display,
{
    let value = positive(vars, name, default)?;
    if value > T::from(MAX_DURATION_SECONDS) {
        return Err(invalid(
            name,
            format!("must be at most {} seconds", MAX_DURATION_SECONDS),
        ));
    }
    Ok(value)
}
