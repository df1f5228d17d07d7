//! Cache metrics

use metrics::counter;

/// Cache metrics collector
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    cache_name: &'static str,
}

impl CacheMetrics {
    /// Create a new metrics collector for a cache
    pub fn new(cache_name: &'static str) -> Self {
        Self { cache_name }
    }

    /// Record a cache hit
    pub fn record_hit(&self) {
        counter!("route_finder_cache_hits_total", "cache" => self.cache_name).increment(1);
    }

    /// Record a cache miss
    pub fn record_miss(&self) {
        counter!("route_finder_cache_misses_total", "cache" => self.cache_name).increment(1);
    }

    /// Record a failed backend access
    pub fn record_error(&self) {
        counter!("route_finder_cache_errors_total", "cache" => self.cache_name).increment(1);
    }
}
