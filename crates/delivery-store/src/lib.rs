//! # Delivery Store
//!
//! Storage backends for the campaign delivery service.
//!
//! This crate defines the three store seams the delivery core talks to and
//! ships their implementations:
//!
//! - [`RuleStore`]: targeting rule documents, queried with a
//!   [`TargetingFilter`](delivery_core::TargetingFilter)
//! - [`CampaignStore`]: campaign documents, queried with a
//!   [`CampaignFilter`](delivery_core::CampaignFilter)
//! - [`CacheStore`]: string key-value entries with TTL plus string sets
//!
//! ## Backends
//!
//! - [`MongoStore`]: MongoDB `rules` and `campaigns` collections
//! - [`RedisCacheStore`]: Redis via a multiplexed connection manager
//! - [`MemoryStore`] / [`MemoryCacheStore`]: in-process backends for local
//!   development and tests, optionally loaded from a YAML [`SeedData`] file
//!
//! ## Example
//!
//! ```ignore
//! use delivery_store::{MongoConfig, MongoStore, RuleStore};
//!
//! let store = MongoStore::connect(&MongoConfig::default()).await?;
//! let batch = store.find_rules(&filter).await?;
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod redis_cache;
pub mod seed;
pub mod traits;

// Re-exports
pub use config::{MemoryCacheConfig, MongoConfig, RedisConfig};
pub use error::{CacheStoreError, DecodeError, SeedError, StoreError};
pub use memory::{MemoryCacheStore, MemoryStore};
pub use mongo::MongoStore;
pub use redis_cache::RedisCacheStore;
pub use seed::SeedData;
pub use traits::{CacheStore, CampaignStore, DocumentBatch, RuleStore};

// Re-export delivery_core for consumers
pub use delivery_core;
