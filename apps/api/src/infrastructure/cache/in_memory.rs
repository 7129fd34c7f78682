use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::domain::repositories::{CacheError, CacheStore};

struct Entry {
    value: String,
    /// `None` when the TTL runs past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Process-local CacheStore
///
/// Expired entries are unreadable immediately and are dropped on the next write.
/// Only suitable for a single instance; use [`RedisCache`](super::RedisCache)
/// when several instances share OTP state.
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now.checked_add(ttl),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(Instant::now()) => Ok(entry.value.clone()),
            _ => Err(CacheError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_stored_value() {
        let cache = InMemoryCache::new();
        cache
            .set("k", "v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), "v");
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let cache = InMemoryCache::new();
        assert!(matches!(cache.get("nope").await, Err(CacheError::NotFound)));
    }

    #[tokio::test]
    async fn expired_key_is_not_found() {
        let cache = InMemoryCache::new();
        cache
            .set("k", "v".to_string(), Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(matches!(cache.get("k").await, Err(CacheError::NotFound)));
    }

    #[tokio::test]
    async fn set_overwrites_and_resets_ttl() {
        let cache = InMemoryCache::new();
        cache
            .set("k", "old".to_string(), Duration::from_millis(10))
            .await
            .unwrap();
        cache
            .set("k", "new".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("k").await.unwrap(), "new");
    }

    #[tokio::test]
    async fn unrepresentable_ttl_never_expires() {
        let cache = InMemoryCache::new();
        cache
            .set("k", "v".to_string(), Duration::MAX)
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), "v");
    }
}
