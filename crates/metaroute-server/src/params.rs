//! Request argument extraction and validation.
//!
//! Arguments are validated before the permission gate runs, so a malformed
//! request is rejected with a 400 regardless of who sent it.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ApiError;
use crate::sanitize::sanitize_text_field;

/// Parse a request body as a JSON object. Empty or non-object bodies carry
/// no arguments.
fn body_object(body: &[u8]) -> serde_json::Map<String, Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::Map::new();
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => serde_json::Map::new(),
    }
}

/// The sanitized `value` argument of a write, from the JSON body or, if the
/// body has none, from the query string.
pub fn value_param(body: &[u8], query: &HashMap<String, String>) -> Result<String, ApiError> {
    let raw = match body_object(body).remove("value") {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Null) | None => None,
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            return Err(ApiError::InvalidParam {
                param: "value".into(),
                reason: "must be a string".into(),
            });
        }
    };
    raw.or_else(|| query.get("value").cloned())
        .map(|v| sanitize_text_field(&v))
        .ok_or_else(|| ApiError::MissingParam("value".into()))
}

/// The `keys` argument of a bulk delete: a non-empty array of strings with
/// at most `max` elements.
pub fn keys_param(body: &[u8], max: usize) -> Result<Vec<String>, ApiError> {
    let Some(Value::Array(items)) = body_object(body).remove("keys") else {
        return Err(ApiError::InvalidKeysArray);
    };
    if items.is_empty() || items.len() > max {
        return Err(ApiError::InvalidKeysArray);
    }
    items
        .into_iter()
        .map(|item| match item {
            Value::String(key) => Ok(key),
            _ => Err(ApiError::InvalidKeysArray),
        })
        .collect()
}
