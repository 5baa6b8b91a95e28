//! Store Module
//!
//! The two-tier caching engine: a bounded in-memory tier (L1) fronting a
//! durable backing tier (L2), with TTL expiry, atomic counters, hash fields,
//! advisory locks, batch operations and glob key enumeration.

mod entry;
mod kv;
mod l1;
mod l2;
mod locks;
mod lru;
mod pattern;
mod stats;


// Re-export public types
pub use entry::CacheEntry;
pub use kv::KvStore;
pub use l1::L1Cache;
pub use l2::{L2Entry, L2Store, MemoryL2};
pub use locks::LockManager;
pub use lru::LruQueue;
pub use pattern::KeyPattern;
pub use stats::StoreStats;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed serialized value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MiB
