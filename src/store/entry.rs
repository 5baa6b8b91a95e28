//! Cache Entry Module
//!
//! Entry structure shared by the storage tiers, plus the expiry policy:
//! pure helpers turning relative TTLs into absolute timestamps and deciding
//! liveness.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A single cached value with expiry metadata and size accounting.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value (schema-less JSON)
    pub value: Value,
    /// Absolute expiration timestamp (Unix milliseconds), None = never expires
    pub expires_at: Option<u64>,
    /// Approximate resident size: key length plus serialized value length
    pub size_bytes: usize,
    /// Store-wide mutation stamp, bumped on every write to the key
    pub version: u64,
    /// True until the matching write-through has been confirmed by L2
    pub dirty: bool,
}

impl CacheEntry {
    /// Creates an entry for a fresh write. It starts dirty; the write-through
    /// marks it clean once L2 confirms.
    pub fn new(value: Value, expires_at: Option<u64>, size_bytes: usize, version: u64) -> Self {
        Self {
            value,
            expires_at,
            size_bytes,
            version,
            dirty: true,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches `expires_at`.
    /// Expired entries are logically absent even while still resident.
    pub fn is_expired(&self) -> bool {
        !is_live(self.expires_at, now_ms())
    }

    // == Time To Live ==
    /// Remaining lifetime in whole seconds, rounded up.
    ///
    /// # Returns
    /// - `-1` if the entry never expires
    /// - `0` if the expiry has already passed
    /// - otherwise at least `1`: partial seconds round up, so a live entry
    ///   never reports zero
    pub fn ttl_remaining_secs(&self) -> i64 {
        match self.expires_at {
            None => -1,
            Some(expires) => {
                let now = now_ms();
                if expires <= now {
                    0
                } else {
                    ((expires - now + 999) / 1000) as i64
                }
            }
        }
    }
}

// == Expiry Policy ==
/// Returns current Unix timestamp in milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

/// Computes the absolute expiry for a relative TTL in seconds.
pub fn expiry_from_ttl(ttl_seconds: u64) -> u64 {
    now_ms() + ttl_seconds * 1000
}

/// Liveness check for bare timestamps, used where no entry struct exists
/// (lock records, L2 rows).
pub fn is_live(expires_at: Option<u64>, now: u64) -> bool {
    match expires_at {
        Some(expires) => expires > now,
        None => true,
    }
}
