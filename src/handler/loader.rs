//! `POST /load/mock`: register or replace a mock at runtime.
//!
//! Any other method is rejected with 405. A body that is missing, cannot
//! be read, or does not decode into a [`Mock`] is rejected with 400 and
//! the registry is left untouched.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::Json;

use crate::error::{LoadError, LoaderBody};
use crate::mock::Mock;
use crate::server::AppState;

pub async fn load_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<LoaderBody>), LoadError> {
    if method != Method::POST {
        tracing::warn!(method = %method, "mock loader called with wrong method");
        return Err(LoadError::MethodNotAllowed(method.to_string()));
    }

    let mock = decode(body).inspect_err(|e| {
        tracing::warn!(error = %e, "rejected mock definition");
    })?;

    let key = mock.key();
    let replaced = state.registry.upsert(mock).await.is_some();
    state.stats.loaded.fetch_add(1, Ordering::Relaxed);
    tracing::info!(key = %key, replaced, "added new mock");

    Ok((StatusCode::CREATED, Json(LoaderBody::new(StatusCode::CREATED))))
}

fn decode(body: Result<Bytes, BytesRejection>) -> Result<Mock, LoadError> {
    let bytes = body.map_err(|e| LoadError::DecodeFailure(e.body_text()))?;
    if bytes.is_empty() {
        return Err(LoadError::DecodeFailure("request body is empty".into()));
    }
    serde_json::from_slice(&bytes).map_err(|e| LoadError::DecodeFailure(e.to_string()))
}
