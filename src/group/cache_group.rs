//! Group
//!
//! Read-through orchestration: local LRU first, then the owning peer, then
//! the loader.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::{ByteView, GroupStats, LruCache, StatsSnapshot};
use crate::error::{CacheError, Result};
use crate::group::Getter;
use crate::peers::{PeerGetter, PeerPicker};

// == Group Builder ==
/// Collects the settings of a [`Group`]; the loader is mandatory.
pub struct GroupBuilder {
    name: String,
    cache_bytes: usize,
    getter: Option<Arc<dyn Getter>>,
}

impl GroupBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cache_bytes: 0,
            getter: None,
        }
    }

    /// Byte budget of the local LRU; `0` means unbounded.
    pub fn cache_bytes(mut self, cache_bytes: usize) -> Self {
        self.cache_bytes = cache_bytes;
        self
    }

    pub fn getter(mut self, getter: impl Getter + 'static) -> Self {
        self.getter = Some(Arc::new(getter));
        self
    }

    pub fn shared_getter(mut self, getter: Arc<dyn Getter>) -> Self {
        self.getter = Some(getter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Build ==
    /// Fails with a configuration error when no loader was supplied.
    pub fn build(self) -> Result<Group> {
        let getter = self.getter.ok_or_else(|| {
            CacheError::Configuration(format!("group {} has no getter", self.name))
        })?;

        let stats = Arc::new(GroupStats::new());
        let on_evict = stats.clone();
        let main_cache: LruCache<ByteView> = LruCache::with_on_evicted(
            self.cache_bytes,
            Box::new(move |_: &str, _: &ByteView| on_evict.record_eviction()),
        );

        Ok(Group {
            name: self.name,
            getter,
            main_cache: Mutex::new(main_cache),
            peers: OnceLock::new(),
            stats,
        })
    }
}

// == Group ==
/// A named cache namespace.
///
/// Only values produced by this node's loader are cached locally; values
/// fetched from a peer are returned without being stored, so each key is
/// cached on its owner. Concurrent misses on the same key are not coalesced.
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: Mutex<LruCache<ByteView>>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    stats: Arc<GroupStats>,
}

impl Group {
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Attaches the peer picker. Allowed once per group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers.set(peers).map_err(|_| {
            CacheError::Configuration(format!(
                "peers registered more than once for group {}",
                self.name
            ))
        })
    }

    // == Get ==
    /// Returns the value for `key`, loading it on a miss.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        self.stats.record_get();
        if key.is_empty() {
            return Err(CacheError::InvalidArgument("key is required".to_string()));
        }

        if let Some(value) = self.lookup_cache(key).await {
            self.stats.record_hit();
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(peers) = self.peers.get() {
            if let Some(peer) = peers.pick_peer(key).await {
                match self.get_from_peer(peer.as_ref(), key).await {
                    Ok(value) => {
                        self.stats.record_peer_load();
                        return Ok(value);
                    }
                    Err(err) => {
                        self.stats.record_peer_error();
                        warn!(group = %self.name, key, error = %err, "failed to get from peer, loading locally");
                    }
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        Ok(ByteView::from(bytes))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.getter.get(key).await {
            Ok(bytes) => bytes,
            Err(source) => {
                self.stats.record_local_load_err();
                return Err(CacheError::Loader {
                    key: key.to_string(),
                    source,
                });
            }
        };
        self.stats.record_local_load();

        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone()).await;
        Ok(value)
    }

    async fn lookup_cache(&self, key: &str) -> Option<ByteView> {
        let mut cache = self.main_cache.lock().await;
        cache.get(key).cloned()
    }

    async fn populate_cache(&self, key: &str, value: ByteView) {
        let mut cache = self.main_cache.lock().await;
        cache.add(key, value);
    }

    // == Introspection ==
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Bytes of keys and values held in the local LRU.
    pub async fn cache_bytes_used(&self) -> usize {
        self.main_cache.lock().await.bytes_used()
    }

    pub async fn cache_entries(&self) -> usize {
        self.main_cache.lock().await.len()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}
