//! Cache Module
//!
//! Local storage for groups: immutable byte views, the byte-budgeted LRU
//! store, and per-group statistics.

mod byteview;
mod lru;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use byteview::ByteView;
pub use lru::{LruCache, OnEvicted};
pub use stats::{GroupStats, StatsSnapshot};

// == Weighted ==
/// Values stored in an [`LruCache`] report their size in bytes.
pub trait Weighted {
    fn weight(&self) -> usize;
}
