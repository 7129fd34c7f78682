use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::repositories::{CacheError, CacheStore};

/// Redis implementation of CacheStore
///
/// Each write is a single `SET key value EX ttl`, so a record is never
/// observed half-written.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connects to `url` and returns a cache backed by a reconnecting manager
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(backend)?;
        let manager = ConnectionManager::new(client).await.map_err(backend)?;
        Ok(Self { manager })
    }
}

fn backend(err: redis::RedisError) -> CacheError {
    CacheError::Backend(err.to_string())
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        // EX 0 is rejected by redis
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(backend)
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await.map_err(backend)?;
        value.ok_or(CacheError::NotFound)
    }
}
