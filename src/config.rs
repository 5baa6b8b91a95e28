//! Configuration Module
//!
//! Server and engine configuration, loaded from environment variables and
//! fixed at construction; there is no hot-reload contract.

use std::env;

/// Engine and server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether the HTTP surface exposes the KV routes
    pub enabled: bool,
    /// L1 resident-bytes cap before eviction
    pub l1_max_bytes: usize,
    /// L1 entry-count cap before eviction
    pub l1_max_items: usize,
    /// Expiry reaper interval in seconds
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `KV_ENABLED` - expose the KV routes ("false"/"0" to disable, default: true)
    /// - `L1_MAX_BYTES` - L1 byte cap (default: 100 MiB)
    /// - `L1_MAX_ITEMS` - L1 item cap (default: 10000)
    /// - `CLEANUP_INTERVAL` - reaper interval in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("KV_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            l1_max_bytes: env::var("L1_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100 * 1024 * 1024),
            l1_max_items: env::var("L1_MAX_ITEMS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            l1_max_bytes: 100 * 1024 * 1024,
            l1_max_items: 10_000,
            cleanup_interval: 60,
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.enabled);
        assert_eq!(config.l1_max_bytes, 100 * 1024 * 1024);
        assert_eq!(config.l1_max_items, 10_000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        env::remove_var("KV_ENABLED");
        env::remove_var("L1_MAX_BYTES");
        env::remove_var("L1_MAX_ITEMS");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert!(config.enabled);
        assert_eq!(config.l1_max_items, 10_000);
        assert_eq!(config.cleanup_interval, 60);
    }
}
