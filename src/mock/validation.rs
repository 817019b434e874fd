//! Static checks for mock definitions.
//!
//! The [`validate`] function catches definitions that the registry would
//! accept but that can never match or never render: empty or relative
//! endpoints, unknown verbs, out-of-range status codes, nested header
//! values, and duplicate match keys. Used by [`FileBundle`](super::bundle::FileBundle)
//! and `ghost validate`; the runtime loader stores mocks unchecked.

use std::collections::HashSet;

use axum::http::{HeaderName, StatusCode};

use super::model::{Mock, Properties, PropertyValue};
use crate::error::ValidationError;

pub const VALID_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "CONNECT", "TRACE",
];

/// Validate a mock endpoint. Returns `Ok(())` or a human-readable error.
pub fn validate_end_point(end_point: &str) -> Result<(), String> {
    if end_point.is_empty() {
        return Err("endpoint cannot be empty".into());
    }
    if !end_point.starts_with('/') {
        return Err("endpoint must start with '/' to be reachable over HTTP".into());
    }
    Ok(())
}

/// Validate a verb. Matching is case-sensitive, so only upper-case names pass.
pub fn validate_verb(verb: &str) -> Result<(), String> {
    if VALID_METHODS.contains(&verb) {
        Ok(())
    } else {
        Err(format!("'{verb}' is not a valid HTTP method"))
    }
}

pub fn validate_status(status: u16) -> Result<(), String> {
    StatusCode::from_u16(status)
        .map(|_| ())
        .map_err(|_| format!("{status} is not a valid HTTP status code"))
}

fn header_errors(
    mock_id: &str,
    field: &str,
    headers: &Properties,
    errors: &mut Vec<ValidationError>,
) {
    for (name, value) in headers {
        if name.parse::<HeaderName>().is_err() {
            errors.push(ValidationError {
                mock: mock_id.to_string(),
                field: format!("{field}.{name}"),
                message: format!("'{name}' is not a valid header name"),
                suggestion: None,
            });
        }
        if matches!(value, PropertyValue::Object(_)) {
            errors.push(ValidationError {
                mock: mock_id.to_string(),
                field: format!("{field}.{name}"),
                message: "header values cannot be nested objects".into(),
                suggestion: None,
            });
        }
    }
}

pub fn validate(mocks: &[Mock]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if mocks.is_empty() {
        errors.push(ValidationError {
            mock: "(root)".into(),
            field: "mocks".into(),
            message: "at least one mock must be defined".into(),
            suggestion: None,
        });
        return Err(errors);
    }

    let mut seen_keys = HashSet::new();

    for (i, mock) in mocks.iter().enumerate() {
        let mock_id = if mock.end_point.is_empty() {
            format!("mocks[{i}]")
        } else {
            mock.key()
        };

        if let Err(msg) = validate_end_point(&mock.end_point) {
            errors.push(ValidationError {
                mock: mock_id.clone(),
                field: "endPoint".into(),
                message: msg,
                suggestion: if !mock.end_point.is_empty() && !mock.end_point.starts_with('/') {
                    Some(format!("did you mean '/{}'?", mock.end_point))
                } else {
                    None
                },
            });
        }

        if let Err(msg) = validate_verb(&mock.request.verb) {
            let upper = mock.request.verb.to_uppercase();
            errors.push(ValidationError {
                mock: mock_id.clone(),
                field: "request.verb".into(),
                message: msg,
                suggestion: VALID_METHODS
                    .contains(&upper.as_str())
                    .then(|| format!("did you mean '{upper}'?")),
            });
        }

        if !seen_keys.insert(mock.key()) {
            errors.push(ValidationError {
                mock: mock_id.clone(),
                field: "endPoint".into(),
                message: "duplicate endpoint and verb, the later mock would replace the earlier"
                    .into(),
                suggestion: None,
            });
        }

        header_errors(&mock_id, "request.headers", &mock.request.headers, &mut errors);
        header_errors(&mock_id, "response.headers", &mock.response.headers, &mut errors);

        if let Err(msg) = validate_status(mock.response.status_code) {
            errors.push(ValidationError {
                mock: mock_id.clone(),
                field: "response.status".into(),
                message: msg,
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, name: &str, mocks: &[Mock]) -> String {
    let mut lines = vec![format!("  bundle '{name}': {} mocks\n", mocks.len())];

    for mock in mocks {
        lines.push(format!(
            "  {} {}  -> {}",
            mock.request.verb, mock.end_point, mock.response.status_code
        ));
        if !mock.request.headers.is_empty() {
            let names: Vec<&str> = mock.request.headers.keys().map(String::as_str).collect();
            lines.push(format!("    headers: {}", names.join(", ")));
        }
        if !mock.request.body.is_empty() {
            let fields: Vec<&str> = mock.request.body.keys().map(String::as_str).collect();
            lines.push(format!("    body:    {}", fields.join(", ")));
        }
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}
