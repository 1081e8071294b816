//! Redis cache backend.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use tracing::info;

use crate::config::RedisConfig;
use crate::error::CacheStoreError;
use crate::traits::CacheStore;

/// [`CacheStore`] backed by Redis.
///
/// Uses a [`ConnectionManager`], which multiplexes commands over a single
/// connection and reconnects on failure. Cloning is cheap.
#[derive(Clone)]
pub struct RedisCacheStore {
    conn: ConnectionManager,
}

impl RedisCacheStore {
    /// Opens a managed connection and checks it with `PING`.
    pub async fn connect(config: &RedisConfig) -> Result<Self, CacheStoreError> {
        let client = Client::open(config.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        let store = Self { conn };

        store.health_check().await?;
        info!("Connected to Redis");

        Ok(store)
    }

    /// Wraps an existing connection manager.
    pub fn from_connection(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheStoreError> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(|e| map_error(key, e))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheStoreError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds(ttl))
            .await
            .map_err(|e| map_error(key, e))
    }

    async fn delete(&self, key: &str) -> Result<(), CacheStoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(|e| map_error(key, e))
    }

    async fn add_member(
        &self,
        key: &str,
        member: &str,
        ttl: Duration,
    ) -> Result<(), CacheStoreError> {
        let mut conn = self.conn.clone();
        let _: () = redis::pipe()
            .atomic()
            .sadd(key, member)
            .ignore()
            .expire(key, ttl_seconds(ttl) as i64)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| map_error(key, e))?;
        Ok(())
    }

    async fn members(&self, key: &str) -> Result<Vec<String>, CacheStoreError> {
        let mut conn = self.conn.clone();
        conn.smembers(key).await.map_err(|e| map_error(key, e))
    }

    async fn health_check(&self) -> Result<(), CacheStoreError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "redis"
    }
}

/// `SETEX` and `EXPIRE` take whole seconds; zero is rejected or deletes the key.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn map_error(key: &str, error: RedisError) -> CacheStoreError {
    if error.code() == Some("WRONGTYPE") {
        CacheStoreError::wrong_type(key)
    } else {
        CacheStoreError::Redis(error)
    }
}
