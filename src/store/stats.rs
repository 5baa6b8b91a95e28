//! Store Statistics Module
//!
//! Tracks engine counters: tier hits and misses, evictions, expirations and
//! durability failures.

use serde::Serialize;

// == Store Stats ==
/// Performance and health counters for the caching engine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Reads served from either tier
    pub hits: u64,
    /// Reads that found nothing live in either tier
    pub misses: u64,
    /// Entries evicted from L1 under capacity pressure
    pub evictions: u64,
    /// Entries dropped because their TTL passed (lazy or swept)
    pub expirations: u64,
    /// L2 writes that failed and left an entry awaiting retry
    pub durability_failures: u64,
    /// Current number of resident L1 entries
    pub total_entries: usize,
    /// Current approximate resident L1 bytes
    pub total_bytes: usize,
}

impl StoreStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// hits / (hits + misses), or 0.0 before any reads.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_durability_failure(&mut self) {
        self.durability_failures += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_zero() {
        let stats = StoreStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.durability_failures, 0);
    }

    #[test]
    fn test_hit_rate_without_reads() {
        assert_eq!(StoreStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = StoreStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.record_hit();
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_counters_accumulate() {
        let mut stats = StoreStats::new();
        stats.record_eviction();
        stats.record_eviction();
        stats.record_expiration();
        stats.record_durability_failure();
        assert_eq!(stats.evictions, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.durability_failures, 1);
    }
}
