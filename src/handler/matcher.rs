//! Request matching against a single candidate mock.
//!
//! The registry holds at most one mock per `endpoint-verb` key, so
//! matching is a lookup followed by two subset checks: every expected
//! header must be present with the exact value (names compared
//! case-insensitively), then every expected body field must be present
//! and equal (names compared case-sensitively). Headers and fields the
//! mock does not mention are ignored.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::{header, HeaderMap, Method, Uri};

use crate::error::MockError;
use crate::mock::model::{render, Mock, Properties, PropertyValue};
use crate::mock::MockRegistry;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The literal request target used as the endpoint half of the match key:
/// the path plus query string, exactly as received.
#[must_use]
pub fn request_target(uri: &Uri) -> &str {
    uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str())
}

pub async fn find_mock(
    registry: &MockRegistry,
    method: &Method,
    uri: &Uri,
) -> Result<Arc<Mock>, MockError> {
    let target = request_target(uri);
    registry
        .lookup(target, method.as_str())
        .await
        .ok_or_else(|| MockError::RouteNotFound {
            url: target.to_string(),
            method: method.to_string(),
        })
}

/// Run the header check, then the body check.
pub fn check_request(mock: &Mock, headers: &HeaderMap, body: &[u8]) -> Result<(), MockError> {
    check_headers(&mock.request.headers, headers)?;
    let incoming = parse_body(headers, body);
    check_body(&mock.request.body, &incoming)
}

pub fn check_headers(expected: &Properties, headers: &HeaderMap) -> Result<(), MockError> {
    let all_match = expected.iter().all(|(name, want)| {
        let Some(got) = headers.get(name.as_str()) else {
            return false;
        };
        if got.is_empty() {
            return false;
        }
        match want {
            PropertyValue::Present => true,
            PropertyValue::Scalar(_) => want
                .as_text()
                .is_some_and(|text| text.as_bytes() == got.as_bytes()),
            PropertyValue::Object(_) => false,
        }
    });

    if all_match {
        Ok(())
    } else {
        Err(MockError::HeaderMismatch {
            wanted: render(expected),
            got: render_headers(headers),
        })
    }
}

fn render_headers(headers: &HeaderMap) -> String {
    let mut seen: BTreeMap<&str, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        seen.entry(name.as_str())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    serde_json::to_string(&seen).unwrap_or_else(|_| "{}".into())
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

/// Parse an incoming body into [`Properties`] according to its content type.
///
/// Form bodies are split on `&` and then on the first `=`; a pair with no
/// `=` maps to an empty string. Keys and values are kept literal, with no
/// percent or `+` decoding. Everything else is parsed as a JSON object.
/// An empty body, or one that is not a JSON object, yields an empty map.
#[must_use]
pub fn parse_body(headers: &HeaderMap, body: &[u8]) -> Properties {
    if body.is_empty() {
        return Properties::new();
    }

    if is_form_encoded(headers) {
        return parse_form(body);
    }

    serde_json::from_slice::<Properties>(body).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "request body is not a JSON object, treating as empty");
        Properties::new()
    })
}

#[must_use]
pub fn parse_form(body: &[u8]) -> Properties {
    body.split(|b| *b == b'&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let pair = String::from_utf8_lossy(pair);
            match pair.split_once('=') {
                Some((k, v)) => (k.to_string(), PropertyValue::text(v)),
                None => (pair.into_owned(), PropertyValue::text("")),
            }
        })
        .collect()
}

pub fn check_body(expected: &Properties, incoming: &Properties) -> Result<(), MockError> {
    if expected.is_empty() {
        return Ok(());
    }

    if !incoming.is_empty() && satisfies(expected, incoming) {
        Ok(())
    } else {
        Err(MockError::BodyMismatch {
            wanted: render(expected),
            got: render(incoming),
        })
    }
}

// A scalar expectation needs an equal scalar; an incoming object or null
// under that key is a mismatch.
fn satisfies(expected: &Properties, incoming: &Properties) -> bool {
    expected.iter().all(|(key, want)| match (want, incoming.get(key)) {
        (_, None) => false,
        (PropertyValue::Present, Some(_)) => true,
        (PropertyValue::Scalar(w), Some(PropertyValue::Scalar(g))) => w == g,
        (PropertyValue::Object(w), Some(PropertyValue::Object(g))) => satisfies(w, g),
        (PropertyValue::Scalar(_) | PropertyValue::Object(_), Some(_)) => false,
    })
}
