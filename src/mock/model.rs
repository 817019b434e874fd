//! Serde data structures for mock definitions.
//!
//! Contains [`Mock`] (the root), [`RequestExpectation`],
//! [`ResponseDefinition`], and the [`Properties`] map shared by header
//! and body sets. The JSON field names (`endPoint`, `verb`, `status`)
//! are the wire format accepted by `POST /load/mock` and mock files.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// String-keyed set of header or body fields, ordered by key.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single value inside [`Properties`].
///
/// JSON `null` maps to [`PropertyValue::Present`]: in an expectation the key
/// must exist with any value, in a `text/plain` response body the key is a
/// literal text fragment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value", into = "Value")]
pub enum PropertyValue {
    /// String, number, boolean or array literal.
    Scalar(Value),
    Object(Properties),
    Present,
}

impl PropertyValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Scalar(Value::String(value.into()))
    }

    /// Textual form of a scalar, as used for header values.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Scalar(Value::String(s)) => Some(Cow::Borrowed(s)),
            Self::Scalar(other) => Some(Cow::Owned(other.to_string())),
            Self::Object(_) | Self::Present => None,
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Present,
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
            other => Self::Scalar(other),
        }
    }
}

impl From<PropertyValue> for Value {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Present => Self::Null,
            PropertyValue::Scalar(v) => v,
            PropertyValue::Object(props) => Self::Object(
                props
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Render a property set as compact JSON for error details and logs.
#[must_use]
pub fn render(props: &Properties) -> String {
    serde_json::to_string(props).unwrap_or_else(|_| "{}".into())
}

/// Build the registry key for an endpoint and verb.
#[must_use]
pub fn match_key(end_point: &str, verb: &str) -> String {
    format!("{end_point}-{verb}")
}

const fn default_status() -> u16 {
    200
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RequestExpectation {
    #[serde(default)]
    pub verb: String,

    #[serde(default)]
    pub headers: Properties,

    #[serde(default)]
    pub body: Properties,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResponseDefinition {
    #[serde(rename = "status", default = "default_status")]
    pub status_code: u16,

    #[serde(default)]
    pub headers: Properties,

    #[serde(default)]
    pub body: Properties,
}

impl Default for ResponseDefinition {
    fn default() -> Self {
        Self {
            status_code: default_status(),
            headers: Properties::new(),
            body: Properties::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Mock {
    #[serde(rename = "endPoint", default)]
    pub end_point: String,

    #[serde(default)]
    pub request: RequestExpectation,

    #[serde(default)]
    pub response: ResponseDefinition,
}

impl Mock {
    #[must_use]
    pub fn key(&self) -> String {
        match_key(&self.end_point, &self.request.verb)
    }
}
