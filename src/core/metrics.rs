// src/core/metrics.rs

//! Defines and registers Prometheus metrics for service monitoring.
//!
//! This module uses `lazy_static` to ensure that metrics are registered only once
//! globally for the entire application lifecycle.

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, TextEncoder, register_counter, register_counter_vec,
    register_gauge, register_histogram,
};

lazy_static! {
    // --- Upstream Counters ---
    /// The total number of requests issued to the upstream recipe provider, labeled by endpoint.
    pub static ref UPSTREAM_REQUESTS_TOTAL: CounterVec =
        register_counter_vec!("larder_upstream_requests_total", "Total number of upstream recipe provider requests.", &["endpoint"]).unwrap();
    /// The total number of upstream requests that failed after all retries.
    pub static ref UPSTREAM_FAILURES_TOTAL: CounterVec =
        register_counter_vec!("larder_upstream_failures_total", "Total number of upstream requests that failed.", &["endpoint"]).unwrap();


    // --- Cache Counters ---
    /// Page cache lookups that were answered without an upstream call.
    pub static ref PAGE_CACHE_HITS_TOTAL: Counter =
        register_counter!("larder_page_cache_hits_total", "Total number of search page cache hits.").unwrap();
    /// Page cache lookups that required walking the cursor chain.
    pub static ref PAGE_CACHE_MISSES_TOTAL: Counter =
        register_counter!("larder_page_cache_misses_total", "Total number of search page cache misses.").unwrap();
    pub static ref RECIPE_CACHE_HITS_TOTAL: Counter =
        register_counter!("larder_recipe_cache_hits_total", "Total number of single recipe cache hits.").unwrap();
    pub static ref RECIPE_CACHE_MISSES_TOTAL: Counter =
        register_counter!("larder_recipe_cache_misses_total", "Total number of single recipe cache misses.").unwrap();
    /// The total number of keys expired by the active TTL sweeper.
    pub static ref EXPIRED_KEYS_TOTAL: Counter =
        register_counter!("larder_expired_keys_total", "Total number of keys expired proactively by the TTL sweeper.").unwrap();


    // --- Gauges ---
    /// The number of keys currently held by the in-process cache, expired ones included until swept.
    pub static ref CACHED_KEYS: Gauge =
        register_gauge!("larder_cached_keys", "Number of keys held by the in-process cache.").unwrap();


    // --- Histograms ---
    /// A histogram of GraphQL request latencies.
    pub static ref REQUEST_LATENCY_SECONDS: Histogram =
        register_histogram!("larder_request_latency_seconds", "Latency of GraphQL request processing in seconds.").unwrap();
}

/// Gathers all registered metrics and encodes them in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode_to_string(&metric_families).unwrap_or_default()
}
