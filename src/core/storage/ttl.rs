// src/core/storage/ttl.rs

//! Implements the active, sampling-based TTL expiration manager.

use super::memory::MemoryStore;
use crate::core::metrics;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// The number of keys to sample in each cycle.
const TTL_SAMPLE_SIZE: usize = 20;
/// The percentage threshold of expired keys in a sample that triggers
/// an immediate re-run of the check.
const TTL_EXPIRED_THRESHOLD_PERCENT: usize = 25;

/// `TtlManager` is a background task that actively expires keys to prevent
/// memory build-up from cached pages and recipes that are never read again.
pub struct TtlManager {
    store: Arc<MemoryStore>,
    interval: Duration,
}

impl TtlManager {
    pub fn new(store: Arc<MemoryStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Runs the main loop for the TTL expiration manager.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!("TTL expiration manager started (active, sampling-based).");
        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.purge_expired_keys_with_sampling();
                }
                _ = shutdown_rx.recv() => {
                    info!("TTL expiration manager shutting down.");
                    return;
                }
            }
        }
    }

    /// Performs one expiration cycle. Returns the number of keys purged.
    ///
    /// A random sample of expired keys is deleted; if the sample was full and a
    /// high share of it was expired, the cycle repeats immediately.
    pub fn purge_expired_keys_with_sampling(&self) -> usize {
        let mut total = 0;
        loop {
            let expired_in_sample = self.store.get_expired_sample_keys(TTL_SAMPLE_SIZE);
            if expired_in_sample.is_empty() {
                break;
            }

            let expired_count = self.store.purge_expired(&expired_in_sample);
            total += expired_count;
            if expired_count > 0 {
                metrics::EXPIRED_KEYS_TOTAL.inc_by(expired_count as f64);
                debug!("Purged {} expired keys from sample.", expired_count);
            }

            if expired_in_sample.len() < TTL_SAMPLE_SIZE {
                break;
            }
            if expired_count * 100 / TTL_SAMPLE_SIZE < TTL_EXPIRED_THRESHOLD_PERCENT {
                break;
            }
        }
        total
    }
}
