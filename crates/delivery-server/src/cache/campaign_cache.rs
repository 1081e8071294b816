//! Cache-aside delivery of targeted campaigns.

use std::sync::Arc;
use std::time::{Duration, Instant};

use delivery_core::{CampaignSummary, Dimensions, NormalizedDimensions, Result};
use delivery_store::CacheStore;
use tracing::{debug, warn};

use crate::cache::keys::{CacheKey, index_key};
use crate::metrics::CacheMetrics;
use crate::targeting::{CampaignFetcher, TargetingResolver};

/// Lifetime of a cached delivery result when nothing else is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60 * 60);

/// Cache-aside orchestrator for campaign delivery.
///
/// On a hit the cached summaries are returned as is. On a miss the targeting
/// rules are resolved, the active campaigns fetched, and the result written
/// back under the tuple's [`CacheKey`] together with one reverse-index entry
/// per resolved campaign, so [`CampaignCache::invalidate`] can find every key
/// a campaign contributed to.
///
/// Only store query failures are returned to the caller. Cache faults degrade
/// to a miss on read and are skipped on write.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use delivery_core::Dimensions;
/// # use delivery_server::cache::CampaignCache;
/// # use delivery_store::{MemoryCacheStore, MemoryStore};
/// # #[tokio::main]
/// # async fn main() -> delivery_core::Result<()> {
/// let store = Arc::new(MemoryStore::new());
/// let cache = CampaignCache::new(store.clone(), store, Arc::new(MemoryCacheStore::default()));
///
/// if let Some(campaigns) = cache.get(&Dimensions::new("spotify", "us", "android")).await? {
///     println!("{} campaigns", campaigns.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CampaignCache {
    cache: Arc<dyn CacheStore>,
    resolver: TargetingResolver,
    fetcher: CampaignFetcher,
    ttl: Duration,
    metrics: CacheMetrics,
}

impl CampaignCache {
    pub fn new(
        rules: Arc<dyn delivery_store::RuleStore>,
        campaigns: Arc<dyn delivery_store::CampaignStore>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            cache,
            resolver: TargetingResolver::new(rules),
            fetcher: CampaignFetcher::new(campaigns),
            ttl: DEFAULT_TTL,
            metrics: CacheMetrics::new(),
        }
    }

    /// Sets the TTL applied to cached delivery results.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn resolver(&self) -> &TargetingResolver {
        &self.resolver
    }

    pub fn fetcher(&self) -> &CampaignFetcher {
        &self.fetcher
    }

    pub fn cache_store(&self) -> &dyn CacheStore {
        self.cache.as_ref()
    }

    /// Returns the campaigns to deliver for a dimension tuple.
    ///
    /// `Ok(None)` when no targeting rule matches; nothing is cached in that
    /// case. `Ok(Some(vec![]))` when campaigns matched but none is active.
    ///
    /// # Errors
    ///
    /// `DeliveryError::QueryFailed` when the rule or campaign store fails.
    pub async fn get(&self, dimensions: &Dimensions) -> Result<Option<Vec<CampaignSummary>>> {
        let dimensions = dimensions.normalize();
        let key = CacheKey::for_dimensions(&dimensions).to_string();

        if let Some(cached) = self.lookup(&key).await {
            return Ok(Some(cached));
        }

        self.populate(&dimensions, &key).await
    }

    /// Reads and decodes a cached result. Every outcome other than a
    /// decodable hit is recorded as a miss.
    async fn lookup(&self, key: &str) -> Option<Vec<CampaignSummary>> {
        let start = Instant::now();
        let result = self.cache.get(key).await;
        self.metrics
            .record_operation_duration("get", start.elapsed());

        let payload = match result {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                self.metrics.record_miss();
                return None;
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                self.metrics.record_miss();
                return None;
            },
        };

        match serde_json::from_str::<Vec<CampaignSummary>>(&payload) {
            Ok(campaigns) => {
                debug!(key = %key, "Cache hit");
                self.metrics.record_hit();
                Some(campaigns)
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Undecodable cache entry, treating as miss");
                self.metrics.record_miss();
                None
            },
        }
    }

    async fn populate(
        &self,
        dimensions: &NormalizedDimensions,
        key: &str,
    ) -> Result<Option<Vec<CampaignSummary>>> {
        let campaign_ids = self.resolver.resolve(dimensions).await?;
        if campaign_ids.is_empty() {
            debug!(dimensions = %dimensions, "No targeting rule matched");
            return Ok(None);
        }

        let campaigns: Vec<CampaignSummary> = self
            .fetcher
            .fetch_active(&campaign_ids)
            .await?
            .iter()
            .map(|campaign| campaign.summary())
            .collect();

        self.write(key, &campaigns).await;
        self.index(key, &campaign_ids).await;

        Ok(Some(campaigns))
    }

    async fn write(&self, key: &str, campaigns: &[CampaignSummary]) {
        let payload = match serde_json::to_string(campaigns) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize delivery result");
                return;
            },
        };

        let start = Instant::now();
        if let Err(e) = self.cache.set(key, &payload, self.ttl).await {
            warn!(key = %key, error = %e, "Cache write failed");
        }
        self.metrics
            .record_operation_duration("set", start.elapsed());
    }

    async fn index(&self, key: &str, campaign_ids: &[String]) {
        for campaign_id in campaign_ids {
            let index = index_key(campaign_id);
            if let Err(e) = self.cache.add_member(&index, key, self.ttl).await {
                warn!(
                    campaign_id = %campaign_id,
                    key = %key,
                    error = %e,
                    "Failed to extend reverse index"
                );
            }
        }
    }
}
