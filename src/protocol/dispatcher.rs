use serde_json::Value;
use tracing::debug;

use super::events::ServerEvent;
use crate::error::EngineError;

/// Decode one inbound frame.
///
/// Returns `Ok(Some(event))` for a recognized frame, `Ok(None)` for a
/// well-formed frame whose `type` this engine does not know (dropped for
/// forward compatibility), and `Err` for malformed input: invalid JSON, a
/// missing `type` tag, or a known type with a bad payload.
pub fn decode_frame(raw: &str) -> Result<Option<ServerEvent>, EngineError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| EngineError::ProtocolDecode(format!("invalid JSON: {e}")))?;

    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| EngineError::ProtocolDecode("frame has no type tag".to_string()))?;

    if !ServerEvent::is_known_type(tag) {
        debug!("Dropping frame with unknown type: {}", tag);
        return Ok(None);
    }

    let tag = tag.to_string();
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| EngineError::ProtocolDecode(format!("bad {tag} payload: {e}")))
}
