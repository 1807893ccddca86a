//! Stroke model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Field injected into every stored stroke.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// One atomic drawing action.
///
/// The payload is whatever the client sent (points, color, width, tool...).
/// The core never inspects it; it only stamps `timestamp` at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Client-supplied fields, minus `timestamp`
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    /// Server write time (Unix ms)
    #[serde(default)]
    pub timestamp: i64,
}

impl Stroke {
    /// Build an unstamped stroke from a submitted JSON value.
    ///
    /// Only well-formedness is checked: the value must be a JSON object. A
    /// client-provided `timestamp` field is discarded.
    pub fn from_payload(value: Value) -> Result<Self> {
        match value {
            Value::Object(mut payload) => {
                payload.remove(TIMESTAMP_FIELD);
                Ok(Self {
                    payload,
                    timestamp: 0,
                })
            }
            other => Err(Error::InvalidInput(format!(
                "stroke payload must be a JSON object, got {}",
                value_kind(&other)
            ))),
        }
    }

    /// Return this stroke stamped with `timestamp`
    #[must_use]
    pub fn stamped(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
