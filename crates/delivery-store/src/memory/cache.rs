//! In-process key-value cache using Moka.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::notification::RemovalCause;
use moka::ops::compute::{CompResult, Op};
use tracing::debug;

use crate::config::MemoryCacheConfig;
use crate::error::CacheStoreError;
use crate::traits::CacheStore;

/// A cached value: a string or a set, each with the TTL of its last write.
#[derive(Debug, Clone)]
enum Slot {
    Value { data: Arc<str>, ttl: Duration },
    Members { members: Arc<BTreeSet<String>>, ttl: Duration },
}

impl Slot {
    fn ttl(&self) -> Duration {
        match self {
            Slot::Value { ttl, .. } | Slot::Members { ttl, .. } => *ttl,
        }
    }
}

/// Every write restarts the entry's TTL, like `SET EX` and `EXPIRE` in Redis.
struct SlotExpiry;

impl Expiry<String, Slot> for SlotExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Slot,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl())
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Slot,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl())
    }
}

/// [`CacheStore`] backed by a Moka cache.
///
/// Mirrors the Redis semantics the delivery path relies on: `set` replaces
/// any previous value, reading a set as a string (or the reverse) fails with
/// [`CacheStoreError::WrongType`], and set additions are atomic per key.
#[derive(Clone)]
pub struct MemoryCacheStore {
    inner: Cache<String, Slot>,
}

impl MemoryCacheStore {
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(SlotExpiry)
            .eviction_listener(|key, _value, cause| {
                let reason = match cause {
                    RemovalCause::Expired => "ttl",
                    RemovalCause::Size => "capacity",
                    RemovalCause::Explicit => "manual",
                    RemovalCause::Replaced => "replaced",
                };
                debug!(key = %key, reason, "Cache entry removed");
            })
            .build();

        Self { inner }
    }

    /// Number of live entries. Pending maintenance may make this lag.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Runs pending expiration and eviction work.
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheStoreError> {
        match self.inner.get(key).await {
            Some(Slot::Value { data, .. }) => Ok(Some(data.to_string())),
            Some(Slot::Members { .. }) => Err(CacheStoreError::wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheStoreError> {
        self.inner
            .insert(
                key.to_string(),
                Slot::Value {
                    data: Arc::from(value),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheStoreError> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn add_member(
        &self,
        key: &str,
        member: &str,
        ttl: Duration,
    ) -> Result<(), CacheStoreError> {
        let result = self
            .inner
            .entry(key.to_string())
            .and_compute_with(|current| async move {
                match current.map(|entry| entry.into_value()) {
                    None => Op::Put(Slot::Members {
                        members: Arc::new(BTreeSet::from([member.to_string()])),
                        ttl,
                    }),
                    Some(Slot::Members { members, .. }) if members.contains(member) => {
                        // re-put to restart the TTL
                        Op::Put(Slot::Members { members, ttl })
                    },
                    Some(Slot::Members { members, .. }) => {
                        let mut members = (*members).clone();
                        members.insert(member.to_string());
                        Op::Put(Slot::Members {
                            members: Arc::new(members),
                            ttl,
                        })
                    },
                    Some(Slot::Value { .. }) => Op::Nop,
                }
            })
            .await;

        match result {
            CompResult::Unchanged(entry) if matches!(entry.value(), Slot::Value { .. }) => {
                Err(CacheStoreError::wrong_type(key))
            },
            _ => Ok(()),
        }
    }

    async fn members(&self, key: &str) -> Result<Vec<String>, CacheStoreError> {
        match self.inner.get(key).await {
            Some(Slot::Members { members, .. }) => Ok(members.iter().cloned().collect()),
            Some(Slot::Value { .. }) => Err(CacheStoreError::wrong_type(key)),
            None => Ok(Vec::new()),
        }
    }

    async fn health_check(&self) -> Result<(), CacheStoreError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
