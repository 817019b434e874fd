//! Rendering a matched mock's [`ResponseDefinition`] into an HTTP response.
//!
//! Headers are copied verbatim. The body is serialized as JSON unless the
//! mock declares `Content-Type: text/plain`, in which case the keys of
//! presence-only (`null`) body entries are concatenated into the payload.

use std::borrow::Cow;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::mock::model::{Properties, PropertyValue, ResponseDefinition};

#[must_use]
pub fn render(definition: &ResponseDefinition) -> Response {
    let status = StatusCode::from_u16(definition.status_code).unwrap_or_else(|_| {
        tracing::error!(
            status = definition.status_code,
            "mock declares an invalid status code, responding 500"
        );
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut headers = build_headers(&definition.headers);

    let body = if !permits_body(status) {
        Body::empty()
    } else if is_text_plain(&definition.headers) {
        Body::from(plain_text(&definition.body))
    } else {
        match serde_json::to_vec(&definition.body) {
            Ok(bytes) => {
                if !headers.contains_key(header::CONTENT_TYPE) {
                    headers.insert(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    );
                }
                Body::from(bytes)
            }
            Err(e) => {
                tracing::error!(error = %e, "could not serialize mock response body");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    };

    (status, headers, body).into_response()
}

fn build_headers(definition: &Properties) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (key, value) in definition {
        let text = match value {
            PropertyValue::Present => String::new(),
            PropertyValue::Scalar(_) => value.as_text().map(Cow::into_owned).unwrap_or_default(),
            PropertyValue::Object(_) => {
                tracing::warn!(header = %key, "nested object in mock response headers, skipping");
                continue;
            }
        };
        match (key.parse::<HeaderName>(), HeaderValue::from_str(&text)) {
            (Ok(name), Ok(val)) => {
                headers.append(name, val);
            }
            _ => {
                tracing::warn!(header = %key, "invalid header name or value in mock response, skipping");
            }
        }
    }
    headers
}

fn is_text_plain(headers: &Properties) -> bool {
    headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .filter_map(|(_, value)| value.as_text())
        .any(|ct| {
            ct.split(';')
                .next()
                .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("text/plain"))
        })
}

/// Concatenate the keys of presence-only entries, in key order.
#[must_use]
pub fn plain_text(body: &Properties) -> String {
    body.iter()
        .filter(|(_, value)| matches!(value, PropertyValue::Present))
        .map(|(key, _)| key.as_str())
        .collect()
}

fn permits_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}
