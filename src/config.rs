//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};
use crate::peers::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the group served by this node
    pub group_name: String,
    /// Byte budget of the group's local LRU (0 = unbounded)
    pub cache_bytes: usize,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Path prefix of the peer protocol
    pub base_path: String,
    /// This node's own base URL as listed in `peers`
    pub self_addr: String,
    /// Base URLs of every node in the cluster, including this one
    pub peers: Vec<String>,
    /// Port of the peer server
    pub server_port: u16,
    /// Port of the front-end API server, if enabled
    pub api_port: Option<u16>,
    /// Request timeout for fetches from peers in seconds
    pub fetch_timeout_secs: u64,
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `GROUP_NAME` - Group name (default: scores)
    /// - `CACHE_BYTES` - LRU byte budget (default: 2048)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `BASE_PATH` - Peer protocol prefix (default: /_geecache/)
    /// - `SELF_ADDR` - This node's base URL (default: http://localhost:8001)
    /// - `PEERS` - Comma-separated peer base URLs (default: SELF_ADDR)
    /// - `SERVER_PORT` - Peer server port (default: 8001)
    /// - `API_PORT` - Front-end API port (default: disabled)
    /// - `FETCH_TIMEOUT_SECS` - Peer fetch timeout (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let self_addr = env::var("SELF_ADDR").unwrap_or(defaults.self_addr);

        let peers = env::var("PEERS")
            .ok()
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|peers| !peers.is_empty())
            .unwrap_or_else(|| vec![self_addr.clone()]);

        Self {
            group_name: env::var("GROUP_NAME").unwrap_or(defaults.group_name),
            cache_bytes: parse_var("CACHE_BYTES").unwrap_or(defaults.cache_bytes),
            replicas: parse_var("REPLICAS").unwrap_or(defaults.replicas),
            base_path: env::var("BASE_PATH").unwrap_or(defaults.base_path),
            self_addr,
            peers,
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            api_port: parse_var("API_PORT"),
            fetch_timeout_secs: parse_var("FETCH_TIMEOUT_SECS")
                .unwrap_or(defaults.fetch_timeout_secs),
        }
    }

    /// Rejects settings the node cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.replicas == 0 {
            return Err(CacheError::Configuration(
                "replicas must be at least 1".to_string(),
            ));
        }
        if !self.base_path.starts_with('/') || !self.base_path.ends_with('/') {
            return Err(CacheError::Configuration(format!(
                "base path must start and end with '/': {}",
                self.base_path
            )));
        }
        if self.group_name.is_empty() {
            return Err(CacheError::Configuration(
                "group name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            group_name: "scores".to_string(),
            cache_bytes: 2 << 10,
            replicas: DEFAULT_REPLICAS,
            base_path: DEFAULT_BASE_PATH.to_string(),
            self_addr: "http://localhost:8001".to_string(),
            peers: vec!["http://localhost:8001".to_string()],
            server_port: 8001,
            api_port: None,
            fetch_timeout_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.group_name, "scores");
        assert_eq!(config.cache_bytes, 2048);
        assert_eq!(config.replicas, 50);
        assert_eq!(config.base_path, "/_geecache/");
        assert_eq!(config.peers, vec![config.self_addr.clone()]);
        assert_eq!(config.api_port, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_replicas() {
        let config = Config {
            replicas: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CacheError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_unterminated_base_path() {
        let config = Config {
            base_path: "/_geecache".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CacheError::Configuration(_))));
    }

    #[test]
    fn test_config_from_env() {
        // Only this test touches these variables
        env::set_var("PEERS", "http://a:8001, http://b:8002,,");
        env::set_var("SELF_ADDR", "http://a:8001");
        env::set_var("CACHE_BYTES", "not-a-number");
        env::set_var("API_PORT", "9999");

        let config = Config::from_env();
        assert_eq!(config.peers, vec!["http://a:8001", "http://b:8002"]);
        assert_eq!(config.self_addr, "http://a:8001");
        assert_eq!(config.cache_bytes, 2048);
        assert_eq!(config.api_port, Some(9999));

        env::remove_var("PEERS");
        env::remove_var("SELF_ADDR");
        env::remove_var("CACHE_BYTES");
        env::remove_var("API_PORT");
    }
}
