//! Response DTOs for the front-end API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::StatsSnapshot;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Name of the group
    pub group: String,
    /// Counters of how gets were resolved
    #[serde(flatten)]
    pub stats: StatsSnapshot,
    /// Local cache hits / gets
    pub hit_rate: f64,
    /// Bytes held in the local LRU
    pub cache_bytes: usize,
    /// Entries held in the local LRU
    pub cache_entries: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a stats snapshot
    pub fn new(
        group: impl Into<String>,
        stats: StatsSnapshot,
        cache_bytes: usize,
        cache_entries: usize,
    ) -> Self {
        Self {
            group: group.into(),
            hit_rate: stats.hit_rate(),
            stats,
            cache_bytes,
            cache_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
