use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// Key was never set or its TTL has elapsed
    #[error("key not found")]
    NotFound,

    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Short-lived key/value store with per-key expiry
///
/// Values are opaque strings; callers own their serialization. A write is a
/// single key and a single value, so implementations can keep it atomic.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<String, CacheError>;
}
