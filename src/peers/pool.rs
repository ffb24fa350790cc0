//! HTTP Peer Pool
//!
//! Consistent-hash peer picker over a configured list of HTTP peers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::peers::{HttpGetter, PeerGetter, PeerPicker};
use crate::ring::{crc32_hash, HashFn, HashRing};

/// Path prefix of the peer protocol.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";
/// Virtual nodes per peer.
pub const DEFAULT_REPLICAS: usize = 50;

/// Ring and fetchers, always replaced together.
#[derive(Debug)]
struct PeerSet {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// Picks the owning peer of a key and hands out its [`HttpGetter`].
///
/// The peer list is replaced wholesale by [`HttpPool::set`]; lookups work on
/// a snapshot taken under the read lock.
#[derive(Debug)]
pub struct HttpPool {
    /// This node's own base URL, e.g. `http://localhost:8001`
    self_addr: String,
    base_path: String,
    replicas: usize,
    hash: HashFn,
    client: reqwest::Client,
    peers: RwLock<Arc<PeerSet>>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool with no peers, the default base path and replica count.
    pub fn new(self_addr: impl Into<String>) -> Self {
        Self {
            self_addr: self_addr.into(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash: crc32_hash,
            client: reqwest::Client::new(),
            peers: RwLock::new(Arc::new(PeerSet {
                ring: HashRing::new(DEFAULT_REPLICAS),
                getters: HashMap::new(),
            })),
        }
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_hasher(mut self, hash: HashFn) -> Self {
        self.hash = hash;
        self
    }

    /// Client shared by every peer's fetcher; carries the request timeout.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    // == Set Peers ==
    /// Rebuilds the ring and the fetchers from `peers`.
    ///
    /// `peers` are base URLs and should include this node's own address so
    /// that it owns its share of the keys.
    pub async fn set<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();

        let mut ring = HashRing::with_hasher(self.replicas, self.hash);
        ring.add(&peers);
        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(format!("{peer}{}", self.base_path), self.client.clone());
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.peers.write().await = Arc::new(PeerSet { ring, getters });
        info!(self_addr = %self.self_addr, peers = peers.len(), "peer set updated");
    }

    /// Returns the address owning `key`, or `None` on an empty ring.
    pub async fn owner_of(&self, key: &str) -> Option<String> {
        let peers = self.peers.read().await.clone();
        peers.ring.get(key).map(str::to_string)
    }
}

#[async_trait]
impl PeerPicker for HttpPool {
    async fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let peers = self.peers.read().await.clone();
        let owner = peers.ring.get(key)?;
        if owner == self.self_addr {
            return None;
        }

        debug!("Pick peer {} for key {}", owner, key);
        peers
            .getters
            .get(owner)
            .map(|getter| getter.clone() as Arc<dyn PeerGetter>)
    }
}
