//! L1 Cache Module
//!
//! The bounded in-memory tier: HashMap storage with LRU eviction driven by
//! both an item cap and a byte cap, lazy expiry on every access, and spill
//! hand-off for evicted entries that are not yet durable.

use std::collections::HashMap;

use serde_json::Value;

use super::entry::{is_live, now_ms, CacheEntry};
use super::lru::LruQueue;
use super::pattern::KeyPattern;
use super::stats::StoreStats;

// == Write Outcome ==
/// Result of a write against L1, carrying everything the write-through to
/// L2 needs after the guard is released.
#[derive(Debug)]
pub struct WriteOutcome {
    /// Mutation stamp of the entry this write produced
    pub version: u64,
    /// Serialized value for the L2 mirror
    pub payload: String,
    /// Absolute expiry the entry carries
    pub expires_at: Option<u64>,
    /// Dirty entries evicted to make room; the caller must flush these to
    /// L2 before letting them go
    pub spill: Vec<(String, CacheEntry)>,
}

// == L1 Cache ==
/// Bounded volatile tier. An insert that would exceed `max_items` or
/// `max_bytes` evicts least-recently-used entries until both limits hold;
/// the key being written is never a victim.
#[derive(Debug)]
pub struct L1Cache {
    entries: HashMap<String, CacheEntry>,
    lru: LruQueue,
    stats: StoreStats,
    max_items: usize,
    max_bytes: usize,
    total_bytes: usize,
    next_version: u64,
}

impl L1Cache {
    pub fn new(max_items: usize, max_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruQueue::new(),
            stats: StoreStats::new(),
            max_items,
            max_bytes,
            total_bytes: 0,
            next_version: 1,
        }
    }

    // == Read ==
    /// Returns the live entry for `key` and marks it most recently used.
    /// An expired entry is treated as absent and its physical state dropped
    /// on the way out. Does not record hit/miss statistics; the facade
    /// decides which accesses are caller-visible reads.
    pub fn read(&mut self, key: &str) -> Option<&CacheEntry> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => return None,
        };
        if expired {
            self.purge(key);
            self.stats.record_expiration();
            return None;
        }
        self.lru.promote(key);
        self.entries.get(key)
    }

    // == Insert ==
    /// Full overwrite with a fresh expiry. The entry starts dirty and waits
    /// for its write-through confirmation.
    pub fn insert(
        &mut self,
        key: String,
        value: Value,
        expires_at: Option<u64>,
        payload: String,
    ) -> WriteOutcome {
        self.insert_with(key, value, expires_at, payload, true)
    }

    /// Insert for entries faulted in from L2: already durable, so they can
    /// be dropped without a spill when evicted. Returns only the spill of
    /// entries displaced to make room.
    pub fn insert_clean(
        &mut self,
        key: String,
        value: Value,
        expires_at: Option<u64>,
        payload: String,
    ) -> Vec<(String, CacheEntry)> {
        self.insert_with(key, value, expires_at, payload, false).spill
    }

    // == Mutate ==
    /// In-place read-modify-write preserving the entry's expiry; the closure
    /// sees the current live value (None when absent or expired) and returns
    /// the replacement. Runs entirely on borrowed state, so under one guard
    /// the whole sequence is atomic.
    pub fn mutate<F>(&mut self, key: &str, f: F) -> WriteOutcome
    where
        F: FnOnce(Option<&Value>) -> Value,
    {
        let current = self
            .read(key)
            .map(|entry| (entry.value.clone(), entry.expires_at));
        let (old_value, expires_at) = match current {
            Some((value, expires_at)) => (Some(value), expires_at),
            None => (None, None),
        };
        let new_value = f(old_value.as_ref());
        let payload =
            serde_json::to_string(&new_value).expect("JSON value serialization cannot fail");
        self.insert_with(key.to_string(), new_value, expires_at, payload, true)
    }

    // == Set Expiry ==
    /// Re-stamps an existing live entry with a new absolute expiry. Returns
    /// None when the key is absent or already expired.
    pub fn set_expiry(&mut self, key: &str, expires_at: Option<u64>) -> Option<WriteOutcome> {
        self.read(key)?;
        let version = self.next_version;
        self.next_version += 1;
        let entry = self.entries.get_mut(key)?;
        entry.expires_at = expires_at;
        entry.version = version;
        entry.dirty = true;
        let payload =
            serde_json::to_string(&entry.value).expect("JSON value serialization cannot fail");
        Some(WriteOutcome {
            version,
            payload,
            expires_at,
            spill: Vec::new(),
        })
    }

    // == Remove ==
    /// Drops a key's physical state. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.purge(key)
    }

    // == Mark Clean ==
    /// Confirms the write-through for `version`. A newer mutation keeps the
    /// entry dirty: the stamp prevents a stale completion from declaring a
    /// later value durable.
    pub fn mark_clean(&mut self, key: &str, version: u64) {
        if let Some(entry) = self.entries.get_mut(key) {
            if entry.version == version {
                entry.dirty = false;
            }
        }
    }

    // == Restore ==
    /// Puts back a spilled entry whose L2 flush failed, unless the key has
    /// been rewritten meanwhile. The caps may transiently overshoot; the
    /// entry stays dirty and remains an eviction candidate.
    pub fn restore(&mut self, key: String, entry: CacheEntry) {
        if self.entries.contains_key(&key) {
            return;
        }
        self.total_bytes += entry.size_bytes;
        self.lru.promote(&key);
        self.entries.insert(key, entry);
    }

    // == Sweep ==
    /// Removes up to `max_removed` expired entries. Returns the number
    /// removed; the reaper calls this in bounded batches.
    pub fn sweep_expired(&mut self, max_removed: usize) -> usize {
        let now = now_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !is_live(entry.expires_at, now))
            .take(max_removed)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.purge(key);
            self.stats.record_expiration();
        }
        expired.len()
    }

    // == Keys ==
    /// Live keys matching the pattern. Expired entries found during the scan
    /// are dropped as a side effect.
    pub fn keys_matching(&mut self, pattern: &KeyPattern) -> Vec<String> {
        let now = now_ms();
        let mut expired = Vec::new();
        let mut matched = Vec::new();
        for (key, entry) in &self.entries {
            if !is_live(entry.expires_at, now) {
                expired.push(key.clone());
            } else if pattern.matches(key) {
                matched.push(key.clone());
            }
        }
        for key in expired {
            self.purge(&key);
            self.stats.record_expiration();
        }
        matched
    }

    // == Stats ==
    /// Snapshot of the counters with current residency totals.
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.total_bytes = self.total_bytes;
        stats
    }

    pub fn record_hit(&mut self) {
        self.stats.record_hit();
    }

    pub fn record_miss(&mut self) {
        self.stats.record_miss();
    }

    pub fn record_durability_failure(&mut self) {
        self.stats.record_durability_failure();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[allow(dead_code)]
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    // == Internals ==

    fn insert_with(
        &mut self,
        key: String,
        value: Value,
        expires_at: Option<u64>,
        payload: String,
        dirty: bool,
    ) -> WriteOutcome {
        let size_bytes = key.len() + payload.len();
        let version = self.next_version;
        self.next_version += 1;

        if let Some(old) = self.entries.remove(&key) {
            self.total_bytes -= old.size_bytes;
        }
        let mut entry = CacheEntry::new(value, expires_at, size_bytes, version);
        entry.dirty = dirty;
        self.total_bytes += size_bytes;
        self.lru.promote(&key);
        self.entries.insert(key.clone(), entry);

        let spill = self.enforce_limits(&key);
        WriteOutcome {
            version,
            payload,
            expires_at,
            spill,
        }
    }

    /// Evicts least-recently-used entries until both caps hold. Clean
    /// victims are dropped (still retrievable from L2); dirty victims are
    /// handed back so the caller can flush them first.
    fn enforce_limits(&mut self, protect: &str) -> Vec<(String, CacheEntry)> {
        let mut spill = Vec::new();
        while self.entries.len() > self.max_items || self.total_bytes > self.max_bytes {
            let victim = match self.lru.pop_oldest() {
                Some(victim) => victim,
                None => break,
            };
            if victim == protect {
                // nothing older remains; the key being written stays
                self.lru.promote(&victim);
                break;
            }
            if let Some(entry) = self.entries.remove(&victim) {
                self.total_bytes -= entry.size_bytes;
                self.stats.record_eviction();
                if entry.dirty {
                    spill.push((victim, entry));
                }
            }
        }
        spill
    }

    fn purge(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.total_bytes -= entry.size_bytes;
                self.lru.forget(key);
                true
            }
            None => false,
        }
    }
}
