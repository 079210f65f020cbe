//! Callbridge HTTP gateway library logic.
//!
//! Exposes the router used by the `callbridge-server` binary and the dial
//! helper used by the `callbridge-dial` CLI. Both share [`config::Config`].

pub mod api;
pub mod cli;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use callbridge_voice::CallInitiator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Call requests are a few dozen bytes; anything larger is rejected early.
const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Places outbound calls through the LiveKit control plane.
    pub initiator: Arc<CallInitiator>,
}

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by load balancers
/// and monitoring. Does not touch LiveKit.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /api/health`, the status-only shape the web client polls.
async fn api_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(api_health))
        .route("/api/call", post(api::make_call_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}

/// Installs the global tracing subscriber from the logging section.
///
/// An unparseable filter falls back to `info`.
pub fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
