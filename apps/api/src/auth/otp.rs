// OTP issuance and verification
//
// Attempt state lives only in the short-lived store, keyed by phone number.
// Concurrent sends for the same phone are not serialized: the last write wins.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::code::{CodeGenerator, ThreadRngCodeGenerator};
use crate::config::OtpConfig;
use crate::domain::errors::{AuthError, AuthResult};
use crate::domain::messaging::MessageSender;
use crate::domain::repositories::{CacheError, CacheStore};
use crate::domain::user::PhoneNumber;

/// Attempt state stored per phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpAttempt {
    pub code: String,
    /// 1-based count of codes sent in the current window
    pub attempt: u32,
    pub sent_at: DateTime<Utc>,
}

/// Result of a successful send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpStatus {
    pub retry_after_seconds: u64,
    pub attempts_left: u32,
}

/// Store key holding the attempt record for `phone`
pub fn cache_key(phone: &str) -> String {
    format!("otp:{}", phone)
}

fn otp_message(code: &str) -> String {
    format!("Your OTP is {}", code)
}

fn elapsed_since(at: DateTime<Utc>) -> Duration {
    Utc::now().signed_duration_since(at)
}

/// `seconds` as a signed duration, saturating instead of overflowing
fn window(seconds: u64) -> Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// Whole seconds, rounded up, until `window` has passed since `at`
///
/// Returns `None` once the window is over.
fn seconds_left(at: DateTime<Utc>, window: Duration) -> Option<i64> {
    let left = window
        .checked_sub(&elapsed_since(at))
        .unwrap_or(Duration::MAX);
    if left <= Duration::zero() {
        return None;
    }
    Some(
        left.num_seconds()
            .saturating_add(i64::from(left.subsec_nanos() > 0)),
    )
}

pub struct OtpService {
    config: OtpConfig,
    sender: Arc<dyn MessageSender>,
    cache: Arc<dyn CacheStore>,
    generator: Arc<dyn CodeGenerator>,
}

impl OtpService {
    pub fn new(
        config: OtpConfig,
        sender: Arc<dyn MessageSender>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self::with_generator(config, sender, cache, Arc::new(ThreadRngCodeGenerator))
    }

    pub fn with_generator(
        config: OtpConfig,
        sender: Arc<dyn MessageSender>,
        cache: Arc<dyn CacheStore>,
        generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        Self {
            config,
            sender,
            cache,
            generator,
        }
    }

    /// Generates a code for `phone`, dispatches it and records the attempt
    ///
    /// Fails with an invalid-parameter error when the phone is malformed,
    /// the attempt limit is reached, or the previous code was sent less than
    /// `retry_after_seconds` ago.
    pub async fn send(&self, phone: &str) -> AuthResult<OtpStatus> {
        let phone = PhoneNumber::new(phone).map_err(|e| AuthError::invalid("phone", e))?;
        let key = cache_key(phone.as_str());

        let attempt = match self.last_attempt(&key).await? {
            None => 1,
            Some(last) => {
                if last.attempt >= self.config.max_attempts {
                    tracing::warn!(attempt = last.attempt, "otp max attempts reached");
                    return Err(AuthError::invalid("otp", "max attempts reached"));
                }
                let retry_window = window(self.config.retry_after_seconds);
                if let Some(wait) = seconds_left(last.sent_at, retry_window) {
                    return Err(AuthError::invalid(
                        "otp",
                        format!("retry too soon, retry after {} seconds", wait),
                    ));
                }
                last.attempt + 1
            }
        };

        let code = if self.is_test_phone(&phone) {
            tracing::debug!("test phone, skipping otp dispatch");
            self.config.test_code.clone()
        } else {
            let code = self.generator.generate(self.config.length);
            self.sender
                .send(phone.as_str(), &otp_message(&code))
                .await
                .map_err(|e| AuthError::server("unable to send otp", e))?;
            code
        };

        let record = OtpAttempt {
            code,
            attempt,
            sent_at: Utc::now(),
        };
        let value = serde_json::to_string(&record)
            .map_err(|e| AuthError::server("unable to encode otp", e))?;
        self.cache
            .set(&key, value, self.config.validity())
            .await
            .map_err(|e| AuthError::server("unable to set otp", e))?;

        tracing::info!(attempt, "otp sent");
        Ok(OtpStatus {
            retry_after_seconds: self.config.retry_after_seconds,
            attempts_left: self.config.max_attempts.saturating_sub(attempt),
        })
    }

    /// Checks `code` against the last code sent to `phone`
    ///
    /// The record is left in place; it stays valid until it expires.
    pub async fn verify(&self, phone: &str, code: &str) -> AuthResult<()> {
        let record = self
            .last_attempt(&cache_key(phone))
            .await?
            .ok_or_else(|| AuthError::invalid("otp", "otp not sent or expired"))?;

        // The store TTL should already have evicted it, but do not rely on that
        if seconds_left(record.sent_at, window(self.config.validity_seconds)).is_none() {
            return Err(AuthError::invalid("otp", "otp expired"));
        }

        if record.code != code {
            tracing::warn!("incorrect otp submitted");
            return Err(AuthError::invalid("otp", "incorrect otp"));
        }

        tracing::info!("otp verified");
        Ok(())
    }

    async fn last_attempt(&self, key: &str) -> AuthResult<Option<OtpAttempt>> {
        match self.cache.get(key).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| AuthError::server("invalid last otp", e)),
            Err(CacheError::NotFound) => Ok(None),
            Err(e) => Err(AuthError::server("unable to get last otp", e)),
        }
    }

    fn is_test_phone(&self, phone: &PhoneNumber) -> bool {
        self.config.test_phone.as_deref() == Some(phone.as_str())
    }
}
