//! Group Module
//!
//! A group is a named cache namespace: a local LRU, a loader for misses and,
//! optionally, a peer picker that routes keys to the node owning them.

mod getter;
mod cache_group;
mod registry;

pub use getter::{Getter, GetterFn};
pub use cache_group::{Group, GroupBuilder};
pub use registry::GroupRegistry;
