//! Peercache - A distributed read-through cache node
//!
//! Serves one group to its peers and, optionally, to clients over a small
//! front-end API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peercache::api::{create_api_router, create_peer_router};
use peercache::{ApiState, AppState, Config, GetterFn, Group, GroupRegistry, HttpPool};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the group registry and the configured group
/// 4. Build the peer pool and register it with the group
/// 5. Start the peer server and, if configured, the API server
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cache node");

    let config = Config::from_env();
    config.validate()?;
    info!(
        "Configuration loaded: group={}, cache_bytes={}, self={}, peers={:?}, port={}",
        config.group_name, config.cache_bytes, config.self_addr, config.peers, config.server_port
    );

    let registry = Arc::new(GroupRegistry::new());
    let db = slow_db();
    let group = registry
        .create(
            Group::builder(config.group_name.clone())
                .cache_bytes(config.cache_bytes)
                .getter(GetterFn::new(move |key| {
                    info!("[SlowDB] search key {}", key);
                    db.get(key)
                        .map(|v| v.as_bytes().to_vec())
                        .ok_or_else(|| anyhow::anyhow!("{key} not exist"))
                })),
        )
        .await?;

    let client = reqwest::Client::builder()
        .timeout(config.fetch_timeout())
        .build()
        .context("building peer HTTP client")?;
    let pool = Arc::new(
        HttpPool::new(config.self_addr.clone())
            .with_base_path(config.base_path.clone())
            .with_replicas(config.replicas)
            .with_client(client),
    );
    pool.set(config.peers.clone()).await;
    group.register_peers(pool)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(());

    let peer_app = create_peer_router(AppState::new(registry.clone(), config.base_path.as_str()));
    let peer_addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let peer_listener = tokio::net::TcpListener::bind(peer_addr)
        .await
        .with_context(|| format!("binding peer server to {peer_addr}"))?;
    info!("Peer server listening on http://{}", peer_addr);
    let mut rx = shutdown_rx.clone();
    let peer_server = tokio::spawn(async move {
        axum::serve(peer_listener, peer_app)
            .with_graceful_shutdown(async move {
                let _ = rx.changed().await;
            })
            .await
    });

    let api_server = match config.api_port {
        Some(port) => {
            let api_app = create_api_router(ApiState::new(group.clone()));
            let api_addr = SocketAddr::from(([0, 0, 0, 0], port));
            let api_listener = tokio::net::TcpListener::bind(api_addr)
                .await
                .with_context(|| format!("binding API server to {api_addr}"))?;
            info!("API server listening on http://{}", api_addr);
            let mut rx = shutdown_rx.clone();
            Some(tokio::spawn(async move {
                axum::serve(api_listener, api_app)
                    .with_graceful_shutdown(async move {
                        let _ = rx.changed().await;
                    })
                    .await
            }))
        }
        None => None,
    };

    shutdown_signal().await;
    let _ = shutdown_tx.send(());

    peer_server.await??;
    if let Some(api_server) = api_server {
        api_server.await??;
    }

    info!("Node shutdown complete");
    Ok(())
}

/// Demo source of truth for the configured group.
fn slow_db() -> HashMap<&'static str, &'static str> {
    HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")])
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
