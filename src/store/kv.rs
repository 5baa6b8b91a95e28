//! Store Facade Module
//!
//! `KvStore` composes the bounded L1 tier, the durable L2 adapter and the
//! advisory lock manager into the public key-value contract. Every method is
//! async for interface uniformity with a networked backing tier, but all
//! read-modify-write sequences run under a single L1 write guard with no
//! await inside, which makes them atomic.
//!
//! Writes land in L1 first and are mirrored to L2 after the guard is
//! released, so concurrent callers observe the new L1 state while durability
//! is still in flight. Reads check L1 and fall back to L2, repopulating L1
//! on the way. Values cross this boundary by value in both directions: a
//! caller can never hold a live reference into internal storage.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::store::entry::{expiry_from_ttl, is_live, now_ms, CacheEntry};
use crate::store::l1::{L1Cache, WriteOutcome};
use crate::store::l2::L2Store;
use crate::store::locks::LockManager;
use crate::store::pattern::KeyPattern;
use crate::store::stats::StoreStats;
use crate::store::{MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == KV Store ==
/// Two-tier key-value store facade.
pub struct KvStore {
    enabled: bool,
    l1: RwLock<L1Cache>,
    locks: RwLock<LockManager>,
    l2: Arc<dyn L2Store>,
}

impl KvStore {
    // == Constructor ==
    /// Builds an engine instance from its configuration and a durable tier
    /// adapter. No ambient state: independent engines can coexist.
    pub fn new(config: &Config, l2: Arc<dyn L2Store>) -> Self {
        Self {
            enabled: config.enabled,
            l1: RwLock::new(L1Cache::new(config.l1_max_items, config.l1_max_bytes)),
            locks: RwLock::new(LockManager::new()),
            l2,
        }
    }

    /// Whether the public surface should expose this store. The engine
    /// itself never refuses calls; gating is the HTTP layer's concern.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // == Scalar Operations ==

    /// Stores a value, optionally expiring after `ttl_seconds`. No TTL means
    /// the entry never expires.
    pub async fn set(&self, key: &str, value: Value, ttl_seconds: Option<u64>) -> Result<()> {
        let payload = validate(key, &value)?;
        let expires_at = ttl_seconds.map(expiry_from_ttl);
        let outcome = {
            let mut l1 = self.l1.write().await;
            l1.insert(key.to_string(), value, expires_at, payload)
        };
        self.write_through(key, outcome).await;
        Ok(())
    }

    /// Retrieves a value: L1 first, then L2 with L1 repopulation. Returns a
    /// detached copy; expired entries read as absent.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        {
            let mut l1 = self.l1.write().await;
            if let Some(entry) = l1.read(key) {
                let value = entry.value.clone();
                l1.record_hit();
                return Ok(Some(value));
            }
        }
        match self.fault_in(key).await? {
            Some(value) => {
                self.l1.write().await.record_hit();
                Ok(Some(value))
            }
            None => {
                self.l1.write().await.record_miss();
                Ok(None)
            }
        }
    }

    /// Removes a key from both tiers. Deleting a missing key is a no-op.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.l1.write().await.remove(key);
        if let Err(err) = self.l2.delete(key).await {
            warn!("L2 delete for key '{}' failed: {}", key, err);
            self.l1.write().await.record_durability_failure();
        }
        Ok(())
    }

    /// Whether a live value exists in either tier.
    pub async fn exists(&self, key: &str) -> Result<bool> {
        {
            let mut l1 = self.l1.write().await;
            if l1.read(key).is_some() {
                return Ok(true);
            }
        }
        Ok(self.fault_in(key).await?.is_some())
    }

    // == TTL Operations ==

    /// Remaining lifetime in seconds: `-2` when the key is absent or
    /// expired, `-1` when it never expires, otherwise whole seconds rounded
    /// up (never 0 while time remains).
    pub async fn ttl(&self, key: &str) -> Result<i64> {
        self.ensure_loaded(key).await?;
        let mut l1 = self.l1.write().await;
        match l1.read(key) {
            Some(entry) => Ok(entry.ttl_remaining_secs()),
            None => Ok(-2),
        }
    }

    /// Sets an expiry on an existing live key. Returns whether it applied;
    /// an absent or expired key is left untouched.
    pub async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool> {
        self.ensure_loaded(key).await?;
        let outcome = {
            let mut l1 = self.l1.write().await;
            l1.set_expiry(key, Some(expiry_from_ttl(ttl_seconds)))
        };
        match outcome {
            Some(outcome) => {
                self.write_through(key, outcome).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // == Counters ==

    pub async fn incr(&self, key: &str) -> Result<i64> {
        self.incr_by(key, 1).await
    }

    pub async fn decr(&self, key: &str) -> Result<i64> {
        self.incr_by(key, -1).await
    }

    /// Atomic add. A missing or non-numeric current value counts as 0; an
    /// existing expiry is preserved.
    pub async fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        check_key(key)?;
        self.ensure_loaded(key).await?;
        let (next, outcome) = {
            let mut l1 = self.l1.write().await;
            // read-modify-write: no suspension between the read and the write
            let mut next = 0;
            let outcome = l1.mutate(key, |current| {
                let current = current.and_then(Value::as_i64).unwrap_or(0);
                next = current + delta;
                Value::from(next)
            });
            (next, outcome)
        };
        self.write_through(key, outcome).await;
        Ok(next)
    }

    // == Hash Operations ==

    /// Writes one field of a hash-shaped value. A non-object existing value
    /// is displaced by a fresh object holding only the new field.
    pub async fn hset(&self, key: &str, field: &str, value: Value) -> Result<()> {
        validate(key, &value)?;
        self.ensure_loaded(key).await?;
        let outcome = {
            let mut l1 = self.l1.write().await;
            l1.mutate(key, |current| {
                let mut fields = as_object(current);
                fields.insert(field.to_string(), value);
                Value::Object(fields)
            })
        };
        self.write_through(key, outcome).await;
        Ok(())
    }

    /// Reads one field. Absent key, non-object value or missing field all
    /// read as None.
    pub async fn hget(&self, key: &str, field: &str) -> Result<Option<Value>> {
        self.ensure_loaded(key).await?;
        let mut l1 = self.l1.write().await;
        Ok(l1
            .read(key)
            .and_then(|entry| entry.value.as_object())
            .and_then(|fields| fields.get(field))
            .cloned())
    }

    /// All fields of a hash-shaped value; an absent key yields an empty map,
    /// never an error.
    pub async fn hget_all(&self, key: &str) -> Result<Map<String, Value>> {
        self.ensure_loaded(key).await?;
        let mut l1 = self.l1.write().await;
        Ok(l1
            .read(key)
            .and_then(|entry| entry.value.as_object())
            .cloned()
            .unwrap_or_default())
    }

    /// Removes one field. A missing key is a no-op and is not materialized.
    pub async fn hdel(&self, key: &str, field: &str) -> Result<()> {
        self.ensure_loaded(key).await?;
        let outcome = {
            let mut l1 = self.l1.write().await;
            if l1.read(key).is_none() {
                return Ok(());
            }
            l1.mutate(key, |current| {
                let mut fields = as_object(current);
                fields.remove(field);
                Value::Object(fields)
            })
        };
        self.write_through(key, outcome).await;
        Ok(())
    }

    /// Atomic add on one field, with the same coercions as `incr_by`.
    pub async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64> {
        check_key(key)?;
        self.ensure_loaded(key).await?;
        let (next, outcome) = {
            let mut l1 = self.l1.write().await;
            let mut next = 0;
            let outcome = l1.mutate(key, |current| {
                let mut fields = as_object(current);
                let current = fields.get(field).and_then(Value::as_i64).unwrap_or(0);
                next = current + delta;
                fields.insert(field.to_string(), Value::from(next));
                Value::Object(fields)
            });
            (next, outcome)
        };
        self.write_through(key, outcome).await;
        Ok(next)
    }

    // == Advisory Locks ==

    /// Tries to take the advisory lock for `key`. Succeeds iff no live lock
    /// record exists; an expired record counts as free. The lock keyspace is
    /// disjoint from the main keyspace and invisible to `keys`. In-process
    /// only: exclusion across processes would need the backing tier's own
    /// atomic primitives.
    pub async fn lock(&self, key: &str, ttl_seconds: u64) -> bool {
        self.locks.write().await.try_acquire(key, ttl_seconds)
    }

    /// Releases the lock regardless of holder. Releasing a free lock is a
    /// no-op.
    pub async fn unlock(&self, key: &str) {
        self.locks.write().await.release(key);
    }

    // == Batch Operations ==

    /// Applies `set` for each pair. Pairs are individually atomic; the batch
    /// as a whole is not, and pairs applied before a validation failure stay
    /// applied.
    pub async fn mset(&self, entries: Map<String, Value>) -> Result<()> {
        for (key, value) in entries {
            self.set(&key, value, None).await?;
        }
        Ok(())
    }

    /// Fetches many keys, preserving request order; absent or expired keys
    /// yield None.
    pub async fn mget(&self, keys: &[String]) -> Result<Vec<Option<Value>>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await?);
        }
        Ok(values)
    }

    // == Key Enumeration ==

    /// Live keys matching an anchored glob (`*` wildcard only) across both
    /// tiers, deduplicated and sorted. Expired L1 entries found during the
    /// scan are dropped as a side effect.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let pattern = KeyPattern::new(pattern);
        let mut matched: BTreeSet<String> = {
            let mut l1 = self.l1.write().await;
            l1.keys_matching(&pattern).into_iter().collect()
        };
        for key in self.l2.scan(&pattern).await.map_err(KvError::Backend)? {
            matched.insert(key);
        }
        Ok(matched.into_iter().collect())
    }

    // == Maintenance ==

    /// Removes up to `max_removed` expired entries from the main keyspace
    /// and as many expired lock records. The expiry reaper calls this in
    /// bounded batches so a large backlog never monopolizes the scheduler.
    pub async fn sweep_expired(&self, max_removed: usize) -> usize {
        let swept = self.l1.write().await.sweep_expired(max_removed);
        let lock_swept = self.locks.write().await.sweep_expired(max_removed);
        swept + lock_swept
    }

    /// Snapshot of the engine's counters.
    pub async fn stats(&self) -> StoreStats {
        self.l1.read().await.stats()
    }

    /// Number of resident L1 entries.
    #[allow(dead_code)]
    pub async fn len(&self) -> usize {
        self.l1.read().await.len()
    }

    // == Internals ==

    /// Consults L2 after an L1 miss and repopulates L1 with whatever it
    /// finds. Returns the live value, if any.
    async fn fault_in(&self, key: &str) -> Result<Option<Value>> {
        let row = self.l2.get(key).await.map_err(KvError::Backend)?;
        let Some(row) = row else {
            return Ok(None);
        };
        if !is_live(row.expires_at, now_ms()) {
            return Ok(None);
        }
        let value: Value =
            serde_json::from_str(&row.payload).map_err(|err| KvError::Backend(err.into()))?;
        let spill = {
            let mut l1 = self.l1.write().await;
            // a writer may have repopulated the key while the round-trip was
            // in flight; its L1 state wins
            if let Some(entry) = l1.read(key) {
                return Ok(Some(entry.value.clone()));
            }
            l1.insert_clean(key.to_string(), value.clone(), row.expires_at, row.payload)
        };
        self.flush_spill(spill).await;
        Ok(Some(value))
    }

    /// Faults the key into L1 if it is not already resident, so a following
    /// read-modify-write sees the durable state. Idempotent.
    async fn ensure_loaded(&self, key: &str) -> Result<()> {
        {
            let mut l1 = self.l1.write().await;
            if l1.read(key).is_some() {
                return Ok(());
            }
        }
        self.fault_in(key).await?;
        Ok(())
    }

    // == Durability ==

    /// Mirrors a completed L1 write to L2. A failure never fails the logical
    /// operation: the entry stays dirty for a retry at eviction time and the
    /// failure is surfaced through the stats counter and the log.
    async fn write_through(&self, key: &str, outcome: WriteOutcome) {
        let WriteOutcome {
            version,
            payload,
            expires_at,
            spill,
        } = outcome;
        match self.l2.set(key, payload, expires_at).await {
            Ok(()) => self.l1.write().await.mark_clean(key, version),
            Err(err) => {
                warn!("L2 write-through for key '{}' failed: {}", key, err);
                self.l1.write().await.record_durability_failure();
            }
        }
        self.flush_spill(spill).await;
    }

    /// Flushes dirty entries evicted from L1. On failure the entry goes back
    /// into L1, transiently overshooting the caps, so eviction never loses
    /// the only copy of a value.
    async fn flush_spill(&self, spill: Vec<(String, CacheEntry)>) {
        for (key, entry) in spill {
            let payload = serde_json::to_string(&entry.value)
                .expect("JSON value serialization cannot fail");
            match self.l2.set(&key, payload, entry.expires_at).await {
                Ok(()) => debug!("spilled evicted key '{}' to L2", key),
                Err(err) => {
                    warn!("L2 spill for evicted key '{}' failed: {}", key, err);
                    let mut l1 = self.l1.write().await;
                    l1.record_durability_failure();
                    l1.restore(key, entry);
                }
            }
        }
    }
}

// == Validation ==

/// Bounds checks shared by every write path. Returns the serialized payload
/// so callers do not serialize twice.
fn validate(key: &str, value: &Value) -> Result<String> {
    check_key(key)?;
    let payload = serde_json::to_string(value).expect("JSON value serialization cannot fail");
    if payload.len() > MAX_VALUE_SIZE {
        return Err(KvError::ValueTooLarge(MAX_VALUE_SIZE));
    }
    Ok(payload)
}

fn check_key(key: &str) -> Result<()> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(KvError::KeyTooLong(MAX_KEY_LENGTH));
    }
    Ok(())
}

/// Field map of the current value; non-object values are displaced by a
/// fresh map (documented destructive coercion).
fn as_object(current: Option<&Value>) -> Map<String, Value> {
    match current.and_then(Value::as_object) {
        Some(fields) => fields.clone(),
        None => Map::new(),
    }
}
