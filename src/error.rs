//! Unified error types for Ghost.
//!
//! [`GhostError`] covers process-level failures (mock files, CLI
//! commands, listener setup). [`MockError`] and [`LoadError`] are the
//! request-facing rejections: they implement `IntoResponse` so handlers
//! can return them directly as structured JSON.

use std::path::PathBuf;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub mock: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  mock {}: {}: {}", self.mock, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GhostError {
    #[error("Mock file not found: {}", path.display())]
    MockFileNotFound { path: PathBuf },

    #[error("Mock file parse error in {path}:\n  {source}")]
    MockFileParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Mock validation failed in {path}:\n{}", format_errors(.errors))]
    MockValidation {
        path: String,
        errors: Vec<ValidationError>,
    },

    #[error("Unsupported mock file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

/// JSON body returned when a request is rejected by the matcher.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub status: String,
    pub detail: String,
}

/// JSON body returned by the loader endpoint, success or failure.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderBody {
    pub status_code: u16,
    pub status: String,
}

impl LoaderBody {
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status_code: status.as_u16(),
            status: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

/// Why an incoming request did not produce a mock response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    #[error("No mock found for Url: {url} and Method: {method}")]
    RouteNotFound { url: String, method: String },

    #[error("Request Headers do not meet expectations. Wanted: {wanted}, Got: {got}")]
    HeaderMismatch { wanted: String, got: String },

    #[error("Request Body does not meet expectations. Wanted: {wanted}, Got: {got}")]
    BodyMismatch { wanted: String, got: String },
}

impl MockError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::RouteNotFound { .. } => StatusCode::BAD_REQUEST,
            Self::HeaderMismatch { .. } | Self::BodyMismatch { .. } => StatusCode::NOT_ACCEPTABLE,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RouteNotFound { .. } => "route_not_found",
            Self::HeaderMismatch { .. } => "header_mismatch",
            Self::BodyMismatch { .. } => "body_mismatch",
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            status_code: status.as_u16(),
            status: status.canonical_reason().unwrap_or_default().to_string(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Rejections from `/load/mock`.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("method {0} not allowed, use POST")]
    MethodNotAllowed(String),

    #[error("could not decode mock definition: {0}")]
    DecodeFailure(String),
}

impl LoadError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::DecodeFailure(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for LoadError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(LoaderBody::new(status))).into_response();
        if matches!(self, Self::MethodNotAllowed(_)) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }
        response
    }
}
