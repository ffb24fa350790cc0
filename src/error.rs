//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for groups, peers and the HTTP surfaces.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Caller supplied an unusable argument (e.g. an empty key)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The group's loader failed to produce a value
    #[error("loader failed for key {key}: {source}")]
    Loader {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// A remote peer could not serve the request
    #[error("remote fetch failed: {0}")]
    RemoteFetch(String),

    /// No group registered under this name
    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// Malformed inbound request
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Setup-time misuse; the process should not continue with it
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) | CacheError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::RemoteFetch(_) => StatusCode::BAD_GATEWAY,
            CacheError::Loader { .. } | CacheError::Configuration(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
