//! API Handlers
//!
//! HTTP request handlers for the peer protocol and the front-end API.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, Uri},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::debug;

use crate::cache::ByteView;
use crate::error::{CacheError, Result};
use crate::group::{Group, GroupRegistry};
use crate::models::{ApiQuery, HealthResponse, StatsResponse};
use crate::peers::DEFAULT_BASE_PATH;

/// State of the peer server: every group this node serves.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GroupRegistry>,
    /// Prefix of peer requests, e.g. `/_geecache/`
    pub base_path: Arc<str>,
}

impl AppState {
    pub fn new(registry: Arc<GroupRegistry>, base_path: impl Into<Arc<str>>) -> Self {
        Self {
            registry,
            base_path: base_path.into(),
        }
    }

    /// State using [`DEFAULT_BASE_PATH`].
    pub fn with_default_base_path(registry: Arc<GroupRegistry>) -> Self {
        Self::new(registry, DEFAULT_BASE_PATH)
    }
}

/// State of the front-end API: the single group it exposes.
#[derive(Clone)]
pub struct ApiState {
    pub group: Arc<Group>,
}

impl ApiState {
    pub fn new(group: Arc<Group>) -> Self {
        Self { group }
    }
}

fn octet_stream(value: ByteView) -> Response {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Bytes::from(value),
    )
        .into_response()
}

/// Handler for GET {base_path}{group}/{key}
///
/// Serves a group's value to another peer. The path must split into exactly
/// a group and a key; both are percent-decoded.
pub async fn peer_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let path = uri.path();
    let rest = path
        .strip_prefix(state.base_path.as_ref())
        .ok_or_else(|| CacheError::BadRequest(format!("unexpected path: {path}")))?;

    let parts: Vec<&str> = rest.splitn(2, '/').collect();
    if parts.len() != 2 {
        return Err(CacheError::BadRequest("bad request".to_string()));
    }

    let decode = |part: &str| {
        urlencoding::decode(part)
            .map(|s| s.into_owned())
            .map_err(|e| CacheError::BadRequest(format!("invalid path encoding: {e}")))
    };
    let group_name = decode(parts[0])?;
    let key = decode(parts[1])?;
    debug!(group = %group_name, key = %key, "peer request");

    let group = state
        .registry
        .get(&group_name)
        .await
        .ok_or(CacheError::GroupNotFound(group_name))?;

    let value = group
        .get(&key)
        .await
        .map_err(|e| CacheError::Internal(e.to_string()))?;

    Ok(octet_stream(value))
}

/// Handler for GET /api?key=...
///
/// Looks the key up in the front-end group.
pub async fn api_handler(
    State(state): State<ApiState>,
    Query(query): Query<ApiQuery>,
) -> Result<Response> {
    let key = query.key().map_err(CacheError::BadRequest)?;
    let value = state.group.get(key).await?;

    Ok(octet_stream(value))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<ApiState>) -> Json<StatsResponse> {
    let group = &state.group;

    Json(StatsResponse::new(
        group.name(),
        group.stats(),
        group.cache_bytes_used().await,
        group.cache_entries().await,
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
