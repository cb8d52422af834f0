//! Meta keys and values.
//!
//! Valid meta keys are non-empty and consist only of ASCII letters, digits,
//! `-` and `_`. Keys are single route segments, so anything else could never
//! have been routed to a handler in the first place.

use crate::error::TypeError;

/// A stored meta value. Values written through the API are plain text.
pub type MetaValue = String;

/// Validate a meta key against the route segment pattern `[a-zA-Z0-9_-]+`.
pub fn validate_meta_key(key: &str) -> Result<(), TypeError> {
    if key.is_empty() {
        return Err(TypeError::InvalidMetaKey {
            key: key.to_string(),
            reason: "meta key must not be empty".into(),
        });
    }
    if let Some(ch) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(TypeError::InvalidMetaKey {
            key: key.to_string(),
            reason: format!("contains forbidden character: {ch:?}"),
        });
    }
    Ok(())
}
