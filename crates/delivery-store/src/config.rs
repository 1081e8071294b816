//! Backend configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the MongoDB document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// Connection string.
    #[serde(default = "default_mongo_uri")]
    pub uri: String,

    /// Database holding both collections.
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection of targeting rule documents.
    #[serde(default = "default_rules_collection")]
    pub rules_collection: String,

    /// Collection of campaign documents.
    #[serde(default = "default_campaigns_collection")]
    pub campaigns_collection: String,

    /// How long the driver waits for a usable server, in milliseconds.
    #[serde(default = "default_server_selection_timeout_ms")]
    pub server_selection_timeout_ms: u64,

    /// Application name reported to the server (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
}

fn default_mongo_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "delivery_service".to_string()
}

fn default_rules_collection() -> String {
    "rules".to_string()
}

fn default_campaigns_collection() -> String {
    "campaigns".to_string()
}

fn default_server_selection_timeout_ms() -> u64 {
    5_000
}

impl MongoConfig {
    /// Returns the server selection timeout.
    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.server_selection_timeout_ms)
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: default_mongo_uri(),
            database: default_database(),
            rules_collection: default_rules_collection(),
            campaigns_collection: default_campaigns_collection(),
            server_selection_timeout_ms: default_server_selection_timeout_ms(),
            app_name: None,
        }
    }
}

/// Configuration for the Redis cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Connection URL, e.g. `redis://:password@host:6379/0`.
    #[serde(default = "default_redis_url")]
    pub url: String,
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

/// Configuration for the in-process cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries (string values and sets alike).
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

fn default_max_capacity() -> u64 {
    10_000
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}
