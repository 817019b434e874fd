//! Request handlers: the catch-all mock responder and the mock loader.
//!
//! [`mock_handler`] is the Axum fallback that receives every request not
//! claimed by `/load/mock` or the health route. It looks the request up
//! in the registry, runs the header and body checks ([`matcher`]), and
//! renders either the mock's response ([`emitter`]) or a structured
//! [`MockError`](crate::error::MockError).

pub mod emitter;
pub mod loader;
pub mod matcher;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};

use crate::server::AppState;

pub async fn mock_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let correlation_id = req_headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);
    let target = matcher::request_target(&uri);

    tracing::info!(
        correlation_id = %correlation_id,
        method = %method,
        target = %target,
        "request received"
    );

    let outcome = matcher::find_mock(&state.registry, &method, &uri)
        .await
        .and_then(|mock| matcher::check_request(&mock, &req_headers, &body).map(|()| mock));

    match outcome {
        Ok(mock) => {
            state.stats.matched.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                correlation_id = %correlation_id,
                key = %mock.key(),
                status = mock.response.status_code,
                "mock matched"
            );
            emitter::render(&mock.response)
        }
        Err(e) => {
            state.stats.rejected.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                correlation_id = %correlation_id,
                reason = e.kind(),
                detail = %e,
                "request rejected"
            );
            e.into_response()
        }
    }
}
