//! Depth-limited copies of relayed log payloads.

use heads_shared::protocol::LogEnvelope;
use serde_json::Value;

pub const OBJECT_MARKER: &str = "[Object]";
pub const ARRAY_MARKER: &str = "[Array]";
/// Sent in place of a record that failed to serialize.
pub const UNSERIALIZABLE: &str = "\"[Unserializable]\"";

/// Copy `value`, replacing containers nested `depth` levels down with a
/// marker string. Scalars are kept at any depth.
pub fn scrub(value: &Value, depth: usize) -> Value {
    match value {
        Value::Object(_) if depth == 0 => Value::String(OBJECT_MARKER.to_string()),
        Value::Array(_) if depth == 0 => Value::String(ARRAY_MARKER.to_string()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), scrub(v, depth - 1)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| scrub(v, depth - 1)).collect()),
        scalar => scalar.clone(),
    }
}

/// Wire form of a client log: the envelope counts as the first level.
pub fn relay_record(payload: &Value, depth: usize) -> String {
    let envelope = LogEnvelope::client(scrub(payload, depth.saturating_sub(1)));
    match serde_json::to_string(&envelope) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize log record: {}", e);
            UNSERIALIZABLE.to_string()
        }
    }
}
