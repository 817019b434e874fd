//! `GET /_ghost/health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, uptime, the number of registered mocks, and cumulative
//! request statistics. Mounted under `/_ghost` so that a mock for the
//! stand-in backend's own `/health` stays reachable.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub mocks: usize,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_matched: u64,
    pub requests_rejected: u64,
    pub mocks_loaded: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        mocks: state.registry.len().await,
        stats: StatsResponse {
            requests_matched: state.stats.matched.load(Ordering::Relaxed),
            requests_rejected: state.stats.rejected.load(Ordering::Relaxed),
            mocks_loaded: state.stats.loaded.load(Ordering::Relaxed),
        },
    })
}
