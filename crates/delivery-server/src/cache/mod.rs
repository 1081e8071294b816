//! Cache module for the delivery service.
//!
//! This module provides the cache-aside layer in front of the targeting
//! resolver and campaign fetcher, with TTL-based expiration, reverse-index
//! invalidation per campaign, and metrics.

pub mod campaign_cache;
pub mod invalidation;
pub mod keys;

// Re-exports
pub use campaign_cache::{CampaignCache, DEFAULT_TTL};
pub use invalidation::InvalidationResult;
pub use keys::{CacheKey, index_key};
