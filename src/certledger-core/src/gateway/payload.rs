use crate::error::gateway::PayloadError;
use serde_json::Value;

/// Decodes a transaction result as UTF-8 JSON. Empty payloads are an error.
pub fn decode_json_payload(payload: &[u8]) -> Result<Value, PayloadError> {
    if payload.is_empty() {
        return Err(PayloadError::Empty);
    }
    serde_json::from_slice(payload).map_err(PayloadError::InvalidJson)
}
