//! API Module
//!
//! HTTP handlers and routing.
//!
//! # Peer server
//! - `GET {base_path}{group}/{key}` - Serve a group's value to another peer
//!
//! # Front-end API
//! - `GET /api?key=K` - Look a key up in the front-end group
//! - `GET /stats` - Group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_api_router, create_peer_router};
