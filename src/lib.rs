//! Peercache - A distributed read-through cache
//!
//! Groups answer gets from a byte-budgeted LRU, from the peer that owns the
//! key on a consistent hash ring, or from a caller-supplied loader.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;
pub mod ring;

pub use api::{ApiState, AppState};
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFn, Group, GroupBuilder, GroupRegistry};
pub use peers::{HttpGetter, HttpPool, PeerGetter, PeerPicker};
pub use ring::HashRing;
