//! API Routes
//!
//! Configures the Axum routers for the peer protocol and the front-end API.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{api_handler, health_handler, peer_handler, stats_handler, ApiState, AppState};

/// Creates the router other peers talk to.
///
/// # Endpoints
/// - `GET {base_path}{group}/{key}` - Raw value bytes of `key` in `group`
///
/// Requests under the base path that do not name both a group and a key
/// are answered with 400.
pub fn create_peer_router(state: AppState) -> Router {
    let base_path = state.base_path.to_string();

    Router::new()
        .route(&base_path, get(peer_handler))
        .route(&format!("{base_path}*rest"), get(peer_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates the front-end router for clients of the cache.
///
/// # Endpoints
/// - `GET /api?key=K` - Value of `K` in the front-end group
/// - `GET /stats` - Statistics of the front-end group
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_api_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", get(api_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
