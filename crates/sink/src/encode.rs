//! Payload encoding
//!
//! Turns a payload map into one line of JSON text. Payload key order is
//! already deterministic (`BTreeMap`), so the same payload always encodes
//! to the same line.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use nebula_message::{Payload, Value};

use crate::common::SinkError;

/// Encode a payload as a single line of JSON
///
/// Raw byte sequences (`Value::Bytes`) become JSON strings holding the
/// standard-alphabet base64 encoding of the bytes, at any nesting depth.
/// base64 is total and reversible for arbitrary binary, which a plain
/// UTF-8 decode is not.
///
/// # Errors
///
/// Returns `SinkError::Serialization` if the payload contains a value JSON
/// cannot represent. With this value model that means non-finite floats
/// (`NaN`, infinities); every other shape encodes by construction.
pub fn to_json_line(payload: &Payload) -> Result<String, SinkError> {
    let object = map_to_json(payload)?;
    serde_json::to_string(&object).map_err(|e| SinkError::serialization(e.to_string()))
}

/// Convert a payload map to a JSON object
fn map_to_json(map: &BTreeMap<String, Value>) -> Result<serde_json::Value, SinkError> {
    let mut object = serde_json::Map::new();
    for (key, value) in map {
        object.insert(key.clone(), value_to_json(key, value)?);
    }
    Ok(serde_json::Value::Object(object))
}

/// Convert one payload value to its JSON projection
///
/// `key` is carried only for error context.
fn value_to_json(key: &str, value: &Value) -> Result<serde_json::Value, SinkError> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Int(i) => Ok(serde_json::Value::Number((*i).into())),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| {
                SinkError::serialization(format!(
                    "value for key '{key}' is a non-finite float ({f}) and cannot be represented in JSON"
                ))
            }),
        Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Bytes(bytes) => Ok(serde_json::Value::String(STANDARD.encode(bytes))),
        Value::Array(values) => {
            let mut array = Vec::with_capacity(values.len());
            for value in values {
                array.push(value_to_json(key, value)?);
            }
            Ok(serde_json::Value::Array(array))
        }
        Value::Map(map) => map_to_json(map),
    }
}
