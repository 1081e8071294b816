//! Cache metrics recording.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const CACHE_HITS_TOTAL: &str = "delivery_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "delivery_cache_misses_total";
pub const CACHE_OPERATION_SECONDS: &str = "delivery_cache_operation_seconds";
pub const CACHE_INVALIDATIONS_TOTAL: &str = "delivery_cache_invalidations_total";
pub const CACHE_INVALIDATED_KEYS_TOTAL: &str = "delivery_cache_invalidated_keys_total";

const CACHE_LABEL: &str = "campaigns";

/// Registra las metricas de cache.
pub fn register_cache_metrics() {
    metrics::describe_counter!(CACHE_HITS_TOTAL, "Delivery lookups served from the cache");
    metrics::describe_counter!(
        CACHE_MISSES_TOTAL,
        "Delivery lookups that had to query the rule and campaign stores"
    );
    metrics::describe_histogram!(
        CACHE_OPERATION_SECONDS,
        metrics::Unit::Seconds,
        "Latency of cache reads and writes"
    );
    metrics::describe_counter!(CACHE_INVALIDATIONS_TOTAL, "Campaign invalidations run");
    metrics::describe_counter!(
        CACHE_INVALIDATED_KEYS_TOTAL,
        "Cache keys removed through a campaign reverse index"
    );
}

/// Recorder de metricas de cache.
/// Mantiene contadores internos (compartidos entre clones) para hit rate y tests.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    invalidated_keys: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!(CACHE_HITS_TOTAL, "cache" => CACHE_LABEL).increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!(CACHE_MISSES_TOTAL, "cache" => CACHE_LABEL).increment(1);
    }

    /// Registra una invalidacion y las keys que elimino
    pub fn record_invalidation(&self, keys: usize) {
        let keys = keys as u64;
        self.invalidated_keys.fetch_add(keys, Ordering::Relaxed);
        counter!(CACHE_INVALIDATIONS_TOTAL, "cache" => CACHE_LABEL).increment(1);
        counter!(CACHE_INVALIDATED_KEYS_TOTAL, "cache" => CACHE_LABEL).increment(keys);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!(
            CACHE_OPERATION_SECONDS,
            "cache" => CACHE_LABEL,
            "operation" => operation
        )
        .record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Keys removed by invalidations since start-up.
    pub fn invalidated_keys(&self) -> u64 {
        self.invalidated_keys.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_metrics_hit_rate() {
        let metrics = CacheMetrics::new();

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        assert!((metrics.hit_rate() - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_hit_rate_without_traffic() {
        assert_eq!(CacheMetrics::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = CacheMetrics::new();
        let clone = metrics.clone();

        clone.record_miss();
        metrics.record_hit();

        assert_eq!(metrics.misses(), 1);
        assert_eq!(clone.hits(), 1);
    }

    #[test]
    fn test_invalidated_keys_accumulate() {
        let metrics = CacheMetrics::new();

        metrics.record_invalidation(3);
        metrics.record_invalidation(0);
        metrics.record_invalidation(2);

        assert_eq!(metrics.invalidated_keys(), 5);
    }
}
