//! Store trait definitions.

use std::time::Duration;

use async_trait::async_trait;
use delivery_core::{Campaign, CampaignFilter, TargetingFilter, TargetingRule};

use crate::error::{CacheStoreError, DecodeError, StoreError};

/// Documents returned by a query, each of which may have failed to decode.
///
/// Callers decide what to do with malformed documents; the delivery path
/// logs and skips them.
pub type DocumentBatch<T> = Vec<Result<T, DecodeError>>;

/// A source of targeting rule documents.
///
/// # Implementors
///
/// - `MongoStore` - queries the `rules` collection
/// - `MemoryStore` - evaluates the filter in process
///
/// # Example
///
/// ```ignore
/// use delivery_store::{RuleStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// let batch = store.find_rules(&filter).await?;
/// let ids: Vec<_> = batch.into_iter().flatten().map(|r| r.campaign_id).collect();
/// ```
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Returns every targeting document matching all predicates of `filter`.
    ///
    /// # Errors
    ///
    /// - `StoreError::Query` if the query or the cursor fails
    /// - `StoreError::Unavailable` if the store cannot be reached
    async fn find_rules(
        &self,
        filter: &TargetingFilter,
    ) -> Result<DocumentBatch<TargetingRule>, StoreError>;

    /// Verifies that the store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Returns the name of this store, used for logging and identification.
    fn name(&self) -> &str;
}

/// A source of campaign documents.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    /// Returns the campaigns selected by `filter`, in store order.
    ///
    /// # Errors
    ///
    /// - `StoreError::Query` if the query or the cursor fails
    /// - `StoreError::Unavailable` if the store cannot be reached
    async fn find_campaigns(
        &self,
        filter: &CampaignFilter,
    ) -> Result<DocumentBatch<Campaign>, StoreError>;

    /// Verifies that the store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Returns the name of this store.
    fn name(&self) -> &str;
}

/// A key-value cache with string values and string sets.
///
/// Semantics follow Redis: `delete` removes a key of any kind and is a no-op
/// when the key is absent; reading the members of an absent set yields an
/// empty list.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads a string value.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheStoreError>;

    /// Writes a string value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheStoreError>;

    /// Removes a key.
    async fn delete(&self, key: &str) -> Result<(), CacheStoreError>;

    /// Adds `member` to the set stored at `key`, creating it if needed, and
    /// sets the set to expire after `ttl`.
    async fn add_member(
        &self,
        key: &str,
        member: &str,
        ttl: Duration,
    ) -> Result<(), CacheStoreError>;

    /// Returns every member of the set stored at `key`.
    async fn members(&self, key: &str) -> Result<Vec<String>, CacheStoreError>;

    /// Verifies that the cache is reachable.
    async fn health_check(&self) -> Result<(), CacheStoreError>;

    /// Returns the name of this cache backend.
    fn name(&self) -> &str;
}
