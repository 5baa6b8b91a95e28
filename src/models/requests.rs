//! Request DTOs for the KV server API
//!
//! Defines the structure of incoming HTTP request bodies. Values are
//! schema-less JSON; shape validation here is limited to what the engine
//! cannot check itself (empty keys, empty field names).

use serde::Deserialize;
use serde_json::{Map, Value};

fn check_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    None
}

/// Body for PUT /set
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store, any JSON shape
    pub value: Value,
    /// Optional TTL in seconds; omitted means the entry never expires
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        check_key(&self.key)
    }
}

/// Body for POST /expire
#[derive(Debug, Clone, Deserialize)]
pub struct ExpireRequest {
    pub key: String,
    /// TTL in seconds
    pub ttl: u64,
}

impl ExpireRequest {
    pub fn validate(&self) -> Option<String> {
        check_key(&self.key)
    }
}

/// Body for POST /incr and POST /decr
#[derive(Debug, Clone, Deserialize)]
pub struct CounterRequest {
    pub key: String,
    /// Step size, defaults to 1
    #[serde(default)]
    pub delta: Option<i64>,
}

impl CounterRequest {
    pub fn validate(&self) -> Option<String> {
        check_key(&self.key)
    }

    pub fn step(&self) -> i64 {
        self.delta.unwrap_or(1)
    }
}

/// Body for POST /hset
#[derive(Debug, Clone, Deserialize)]
pub struct HashSetRequest {
    pub key: String,
    pub field: String,
    pub value: Value,
}

impl HashSetRequest {
    pub fn validate(&self) -> Option<String> {
        check_key(&self.key).or_else(|| {
            if self.field.is_empty() {
                Some("Field cannot be empty".to_string())
            } else {
                None
            }
        })
    }
}

/// Body for POST /hdel
#[derive(Debug, Clone, Deserialize)]
pub struct HashDeleteRequest {
    pub key: String,
    pub field: String,
}

impl HashDeleteRequest {
    pub fn validate(&self) -> Option<String> {
        check_key(&self.key)
    }
}

/// Body for POST /hincrby
#[derive(Debug, Clone, Deserialize)]
pub struct HashCounterRequest {
    pub key: String,
    pub field: String,
    pub delta: i64,
}

impl HashCounterRequest {
    pub fn validate(&self) -> Option<String> {
        check_key(&self.key)
    }
}

/// Body for POST /mset
#[derive(Debug, Clone, Deserialize)]
pub struct MSetRequest {
    /// Key → value pairs, each applied as an individual set
    pub entries: Map<String, Value>,
}

/// Body for POST /mget
#[derive(Debug, Clone, Deserialize)]
pub struct MGetRequest {
    pub keys: Vec<String>,
}

/// Body for POST /lock and POST /unlock
#[derive(Debug, Clone, Deserialize)]
pub struct LockRequest {
    pub key: String,
    /// Lock TTL in seconds; ignored by unlock
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl LockRequest {
    pub fn validate(&self) -> Option<String> {
        check_key(&self.key)
    }
}

/// Query parameters for GET /keys
#[derive(Debug, Clone, Deserialize)]
pub struct KeysParams {
    /// Glob pattern, `*` by default
    #[serde(default)]
    pub pattern: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": {"nested": true}}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, json!({"nested": true}));
        assert!(req.ttl.is_none());
    }

    #[test]
    fn test_set_request_with_ttl() {
        let json = r#"{"key": "test", "value": 1, "ttl": 60}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl, Some(60));
    }

    #[test]
    fn test_set_request_empty_key_rejected() {
        let req = SetRequest {
            key: String::new(),
            value: json!(1),
            ttl: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_counter_request_default_step() {
        let req: CounterRequest = serde_json::from_str(r#"{"key": "c"}"#).unwrap();
        assert_eq!(req.step(), 1);

        let req: CounterRequest = serde_json::from_str(r#"{"key": "c", "delta": 5}"#).unwrap();
        assert_eq!(req.step(), 5);
    }

    #[test]
    fn test_hash_set_request_empty_field_rejected() {
        let req = HashSetRequest {
            key: "k".to_string(),
            field: String::new(),
            value: json!(1),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_mset_request_deserialize() {
        let json = r#"{"entries": {"a": 1, "b": "two"}}"#;
        let req: MSetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.entries.len(), 2);
    }

    #[test]
    fn test_lock_request_without_ttl() {
        let req: LockRequest = serde_json::from_str(r#"{"key": "res"}"#).unwrap();
        assert!(req.ttl.is_none());
    }
}
