//! Error types for the local control client
//!
//! The player and the token service both answer with loosely shaped JSON.
//! This module owns the helpers that turn a response body into a JSON object
//! and pull typed fields or the `{"error": {...}}` envelope out of it.

use serde_json::{Map, Value};
use thiserror::Error;

/// Structured error reported by the player inside a JSON error envelope
///
/// ```json
/// {"error": {"type": "4101", "message": "Invalid Csrf token"}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Spotify API error {code}: {message}")]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

/// Local control client errors
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid JSON response: {0}")]
    Parse(String),

    #[error("Unexpected response: {0}")]
    Protocol(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Spotify port in range {start}-{end} not found, is it running?")]
    PortNotFound { start: u16, end: u16 },

    #[error("Unsupported Spotify URI: {0}")]
    UnsupportedUri(String),
}

impl ControlError {
    /// Get the API error if the player returned an error envelope
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ControlError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// True for connection failures and timeouts
    pub fn is_network(&self) -> bool {
        matches!(self, ControlError::Network(_))
    }
}

/// Parse a response body into a JSON object
pub(crate) fn parse_object(body: &str) -> Result<Map<String, Value>, ControlError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ControlError::Parse(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ControlError::Parse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Extract the error envelope, if the object carries one
///
/// A missing or non-numeric `type` becomes code 0 and a missing `message`
/// becomes an empty string.
pub fn error_from_json(map: &Map<String, Value>) -> Option<ApiError> {
    let error = map.get("error")?.as_object()?;

    let code = match error.get("type") {
        Some(Value::String(s)) => s.parse::<i32>().unwrap_or(0),
        Some(Value::Number(n)) => n.as_i64().and_then(|n| i32::try_from(n).ok()).unwrap_or(0),
        _ => 0,
    };
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(ApiError { code, message })
}

/// Fail with the envelope error if present
pub(crate) fn check_envelope(map: &Map<String, Value>) -> Result<(), ControlError> {
    match error_from_json(map) {
        Some(err) => {
            tracing::warn!(code = err.code, message = %err.message, "Spotify returned an error envelope");
            Err(err.into())
        }
        None => Ok(()),
    }
}

/// Extract a required, non-empty string field
///
/// Absence, a non-string value and an empty string are all reported as
/// protocol errors, each with its own message.
pub(crate) fn required_str(
    map: &Map<String, Value>,
    key: &str,
    what: &str,
) -> Result<String, ControlError> {
    match map.get(key) {
        None => Err(ControlError::Protocol(format!(
            "{} not found in Spotify API response (missing \"{}\")",
            what, key
        ))),
        Some(Value::String(s)) if s.is_empty() => Err(ControlError::Protocol(format!(
            "{} invalid in Spotify API response (empty \"{}\")",
            what, key
        ))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ControlError::Protocol(format!(
            "{} invalid in Spotify API response (\"{}\" is {})",
            what,
            key,
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
