//! Store doubles with call counters and injectable failures.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use delivery_core::{Campaign, CampaignFilter, TargetingFilter, TargetingRule};
use delivery_store::{
    CacheStore, CacheStoreError, CampaignStore, DocumentBatch, MemoryCacheStore, MemoryStore,
    RuleStore, StoreError,
};

/// Rule and campaign store that counts queries and can be told to fail.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    rule_queries: AtomicUsize,
    campaign_queries: AtomicUsize,
    pub fail_rules: AtomicBool,
    pub fail_campaigns: AtomicBool,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn rule_queries(&self) -> usize {
        self.rule_queries.load(Ordering::SeqCst)
    }

    pub fn campaign_queries(&self) -> usize {
        self.campaign_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuleStore for CountingStore {
    async fn find_rules(
        &self,
        filter: &TargetingFilter,
    ) -> Result<DocumentBatch<TargetingRule>, StoreError> {
        self.rule_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_rules.load(Ordering::SeqCst) {
            return Err(StoreError::query("rules", "connection refused"));
        }
        self.inner.find_rules(filter).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[async_trait]
impl CampaignStore for CountingStore {
    async fn find_campaigns(
        &self,
        filter: &CampaignFilter,
    ) -> Result<DocumentBatch<Campaign>, StoreError> {
        self.campaign_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_campaigns.load(Ordering::SeqCst) {
            return Err(StoreError::query("campaigns", "cursor killed"));
        }
        self.inner.find_campaigns(filter).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        if self.fail_campaigns.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("campaign store down"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Cache store whose operations can be made to fail one by one.
#[derive(Default)]
pub struct FaultyCache {
    pub inner: MemoryCacheStore,
    sets: AtomicUsize,
    pub fail_get: AtomicBool,
    pub fail_set: AtomicBool,
    pub fail_add_member: AtomicBool,
    pub fail_members: AtomicBool,
    failing_deletes: Mutex<HashSet<String>>,
}

impl FaultyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls, failed ones included.
    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn fail_delete_of(&self, key: &str) {
        self.failing_deletes.lock().unwrap().insert(key.to_string());
    }

    fn unavailable() -> CacheStoreError {
        CacheStoreError::unavailable("injected failure")
    }
}

#[async_trait]
impl CacheStore for FaultyCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheStoreError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheStoreError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheStoreError> {
        if self.failing_deletes.lock().unwrap().contains(key) {
            return Err(Self::unavailable());
        }
        self.inner.delete(key).await
    }

    async fn add_member(
        &self,
        key: &str,
        member: &str,
        ttl: Duration,
    ) -> Result<(), CacheStoreError> {
        if self.fail_add_member.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.add_member(key, member, ttl).await
    }

    async fn members(&self, key: &str) -> Result<Vec<String>, CacheStoreError> {
        if self.fail_members.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.members(key).await
    }

    async fn health_check(&self) -> Result<(), CacheStoreError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "faulty"
    }
}
