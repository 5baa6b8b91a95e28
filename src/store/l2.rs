//! L2 Persistence Module
//!
//! Boundary to the durable backing tier. The engine speaks to it through the
//! `L2Store` trait over serialized JSON payloads; the on-disk format and
//! transaction semantics behind the trait are the adapter's business. The
//! in-memory implementation below backs the default binary and the test
//! suite; a database adapter plugs in behind the same trait.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::entry::{is_live, now_ms};
use super::pattern::KeyPattern;

// == L2 Entry ==
/// A row as the durable tier stores it: serialized JSON plus expiry.
#[derive(Debug, Clone)]
pub struct L2Entry {
    pub payload: String,
    pub expires_at: Option<u64>,
}

// == L2 Store Trait ==
/// Contract the durable tier must satisfy. Only eventual durability and
/// crash consistency are required of implementations.
#[async_trait]
pub trait L2Store: Send + Sync {
    /// Fetches a live row. Expired rows are treated as absent.
    async fn get(&self, key: &str) -> Result<Option<L2Entry>>;

    /// Inserts or overwrites a row.
    async fn set(&self, key: &str, payload: String, expires_at: Option<u64>) -> Result<()>;

    /// Removes a row. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Enumerates live keys matching the pattern.
    async fn scan(&self, pattern: &KeyPattern) -> Result<Vec<String>>;
}

// == In-Memory L2 ==
/// Map-backed stand-in for a durable store.
#[derive(Debug, Default)]
pub struct MemoryL2 {
    rows: Mutex<HashMap<String, L2Entry>>,
}

impl MemoryL2 {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl L2Store for MemoryL2 {
    async fn get(&self, key: &str) -> Result<Option<L2Entry>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .get(key)
            .filter(|row| is_live(row.expires_at, now_ms()))
            .cloned())
    }

    async fn set(&self, key: &str, payload: String, expires_at: Option<u64>) -> Result<()> {
        let mut rows = self.rows.lock().await;
        rows.insert(key.to_string(), L2Entry { payload, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut rows = self.rows.lock().await;
        rows.remove(key);
        Ok(())
    }

    async fn scan(&self, pattern: &KeyPattern) -> Result<Vec<String>> {
        let now = now_ms();
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .filter(|(key, row)| is_live(row.expires_at, now) && pattern.matches(key))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::entry::expiry_from_ttl;

    #[tokio::test]
    async fn test_set_and_get_roundtrip() {
        let l2 = MemoryL2::new();
        l2.set("k", "\"v\"".to_string(), None).await.unwrap();

        let row = l2.get("k").await.unwrap().unwrap();
        assert_eq!(row.payload, "\"v\"");
        assert!(row.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_get_missing_row() {
        let l2 = MemoryL2::new();
        assert!(l2.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_row_is_absent() {
        let l2 = MemoryL2::new();
        l2.set("k", "1".to_string(), Some(now_ms() - 1)).await.unwrap();
        assert!(l2.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let l2 = MemoryL2::new();
        l2.set("k", "1".to_string(), None).await.unwrap();
        l2.delete("k").await.unwrap();
        l2.delete("k").await.unwrap();
        assert!(l2.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scan_filters_pattern_and_expiry() {
        let l2 = MemoryL2::new();
        l2.set("user:1", "1".to_string(), None).await.unwrap();
        l2.set("user:2", "2".to_string(), Some(expiry_from_ttl(60)))
            .await
            .unwrap();
        l2.set("user:3", "3".to_string(), Some(now_ms() - 1)).await.unwrap();
        l2.set("post:1", "4".to_string(), None).await.unwrap();

        let mut keys = l2.scan(&KeyPattern::new("user:*")).await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["user:1".to_string(), "user:2".to_string()]);
    }
}
