//! HTTP Peer Client
//!
//! Fetches `{base_url}{group}/{key}` from a remote peer.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::peers::PeerGetter;

// == HTTP Getter ==
/// Fetch capability bound to one peer.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    /// Peer address plus base path, e.g. `http://10.0.0.2:8001/_geecache/`
    base_url: String,
    client: reqwest::Client,
}

impl HttpGetter {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url_for(group, key);
        debug!("Fetching from peer: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::RemoteFetch(format!("{url}: {e}")))?;

        if response.status() != StatusCode::OK {
            return Err(CacheError::RemoteFetch(format!(
                "server returned: {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::RemoteFetch(format!("reading response body: {e}")))?;

        Ok(body.to_vec())
    }
}
