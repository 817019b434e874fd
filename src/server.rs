//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the mock
//! registry, request statistics, and uptime), [`build_router`] for
//! constructing the Axum router with middleware layers, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{any, get};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{loader, mock_handler};
use crate::health::health_handler;
use crate::mock::MockRegistry;

pub const LOAD_PATH: &str = "/load/mock";
pub const HEALTH_PATH: &str = "/_ghost/health";

#[derive(Debug)]
pub struct Stats {
    pub matched: AtomicU64,
    pub rejected: AtomicU64,
    pub loaded: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            matched: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            loaded: AtomicU64::new(0),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub registry: MockRegistry,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    #[must_use]
    pub fn new(registry: MockRegistry) -> Self {
        Self {
            registry,
            start_time: Instant::now(),
            stats: Stats::new(),
        }
    }
}

pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    Router::new()
        .route(LOAD_PATH, any(loader::load_handler))
        .route(HEALTH_PATH, get(health_handler))
        .fallback(mock_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

/// Resolves on the first Ctrl+C or SIGTERM. A signal whose handler cannot
/// be installed is logged and never fires.
pub async fn shutdown_signal() {
    tokio::select! {
        () = wait_for("Ctrl+C", tokio::signal::ctrl_c()) => {}
        () = wait_for("SIGTERM", sigterm()) => {}
    }
}

async fn wait_for(
    name: &'static str,
    signal: impl std::future::Future<Output = std::io::Result<()>>,
) {
    match signal.await {
        Ok(()) => tracing::info!(signal = name, "shutting down"),
        Err(e) => {
            tracing::error!(signal = name, error = %e, "failed to install signal handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
async fn sigterm() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn sigterm() -> std::io::Result<()> {
    std::future::pending().await
}
