//! Lock Manager Module
//!
//! Advisory mutual-exclusion records in a keyspace disjoint from the main
//! cache: a lock key can never collide with a cache key and never shows up
//! in `keys` enumeration.

use std::collections::HashMap;

use super::entry::now_ms;

// == Lock Manager ==
/// Holds advisory lock records as key → absolute expiry (Unix milliseconds).
/// A record with a past expiry counts as free, so a crashed holder cannot
/// deadlock future acquirers.
#[derive(Debug, Default)]
pub struct LockManager {
    held: HashMap<String, u64>,
}

impl LockManager {
    pub fn new() -> Self {
        Self {
            held: HashMap::new(),
        }
    }

    // == Try Acquire ==
    /// Takes the lock iff no live record exists. The whole check-and-insert
    /// runs on borrowed state, so under one guard it is atomic.
    pub fn try_acquire(&mut self, key: &str, ttl_seconds: u64) -> bool {
        let now = now_ms();
        if let Some(&expires_at) = self.held.get(key) {
            if expires_at > now {
                return false;
            }
        }
        self.held.insert(key.to_string(), now + ttl_seconds * 1000);
        true
    }

    // == Release ==
    /// Clears the record regardless of who acquired it. Releasing a free
    /// lock is a no-op.
    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Whether a live record currently exists for `key`.
    #[allow(dead_code)]
    pub fn is_held(&self, key: &str) -> bool {
        match self.held.get(key) {
            Some(&expires_at) => expires_at > now_ms(),
            None => false,
        }
    }

    // == Sweep ==
    /// Removes up to `max_removed` expired records so abandoned locks do not
    /// accumulate. Returns the number removed.
    pub fn sweep_expired(&mut self, max_removed: usize) -> usize {
        let now = now_ms();
        let expired: Vec<String> = self
            .held
            .iter()
            .filter(|(_, &expires_at)| expires_at <= now)
            .take(max_removed)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.held.remove(key);
        }
        expired.len()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_acquire_free_lock() {
        let mut locks = LockManager::new();
        assert!(locks.try_acquire("res", 10));
        assert!(locks.is_held("res"));
    }

    #[test]
    fn test_acquire_held_lock_fails() {
        let mut locks = LockManager::new();
        assert!(locks.try_acquire("res", 10));
        assert!(!locks.try_acquire("res", 10));
    }

    #[test]
    fn test_release_frees_lock() {
        let mut locks = LockManager::new();
        locks.try_acquire("res", 10);
        locks.release("res");
        assert!(locks.try_acquire("res", 10));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut locks = LockManager::new();
        locks.release("never-held");
        locks.try_acquire("res", 10);
        locks.release("res");
        locks.release("res");
        assert!(locks.is_empty());
    }

    #[test]
    fn test_expired_lock_is_free() {
        let mut locks = LockManager::new();
        assert!(locks.try_acquire("res", 1));
        sleep(Duration::from_millis(1100));
        assert!(!locks.is_held("res"));
        assert!(locks.try_acquire("res", 10));
    }

    #[test]
    fn test_independent_keys_do_not_interfere() {
        let mut locks = LockManager::new();
        assert!(locks.try_acquire("a", 10));
        assert!(locks.try_acquire("b", 10));
        assert!(!locks.try_acquire("a", 10));
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let mut locks = LockManager::new();
        locks.try_acquire("stale", 1);
        locks.try_acquire("fresh", 60);
        sleep(Duration::from_millis(1100));

        let removed = locks.sweep_expired(16);
        assert_eq!(removed, 1);
        assert_eq!(locks.len(), 1);
        assert!(locks.is_held("fresh"));
    }

    #[test]
    fn test_sweep_respects_batch_limit() {
        let mut locks = LockManager::new();
        for i in 0..10 {
            locks.try_acquire(&format!("lock:{}", i), 1);
        }
        sleep(Duration::from_millis(1100));

        assert_eq!(locks.sweep_expired(4), 4);
        assert_eq!(locks.len(), 6);
        assert_eq!(locks.sweep_expired(100), 6);
        assert!(locks.is_empty());
    }
}
