//! Decoded event types

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// The data of one event, after the best-effort JSON parse
///
/// Payloads that are not valid JSON are kept as the original text. Parsing
/// follows `serde_json`, which is stricter than a browser's `JSON.parse` in
/// two places: numbers outside the `f64` range (e.g. `1e400`) and documents
/// nested more than 128 levels deep do not parse, so they arrive as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// The payload parsed as JSON
    Json(Value),
    /// The payload as received
    Text(String),
}

impl Payload {
    /// Parse `raw` as JSON, keeping it as text if it does not parse
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(raw),
        }
    }

    /// Get the parsed JSON value, if the payload parsed
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Get the payload as a string slice
    ///
    /// Returns raw text as-is, and JSON values only when they are strings.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Json(value) => value.as_str(),
            Self::Text(text) => Some(text),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json(_))
    }

    /// Convert into a JSON value; raw text becomes a JSON string
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }

    /// Deserialize the payload into a typed value
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.as_json()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// A completed event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SseEvent {
    /// Event type (`"message"` unless the stream named one)
    #[serde(rename = "event")]
    pub event_type: String,

    /// Event data
    #[serde(rename = "data")]
    pub payload: Payload,
}

impl SseEvent {
    pub fn new(event_type: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            event_type: event_type.into(),
            payload: payload.into(),
        }
    }
}
