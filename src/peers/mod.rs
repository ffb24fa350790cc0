//! Peers Module
//!
//! Capabilities for reaching the node that owns a key, and their HTTP
//! implementation.
//!
//! # Components
//! - `PeerPicker` - chooses the owning peer for a key
//! - `PeerGetter` - fetches a group's value from one peer
//! - `HttpPool` - consistent-hash picker over HTTP peers
//! - `HttpGetter` - reqwest-based fetcher

mod client;
mod pool;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpGetter;
pub use pool::{HttpPool, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

// == Peer Picker ==
/// Locates the peer that owns a key.
#[async_trait]
pub trait PeerPicker: Send + Sync {
    /// Returns `None` when the key should be handled locally.
    async fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Fetches a value from one remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}
