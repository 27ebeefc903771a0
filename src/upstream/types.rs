//! Upstream EMY payload types and the re-indexing transform.

use serde_json::{Map, Value};

use crate::error::UpstreamError;

/// Name of the field carrying the patient records in the upstream body.
pub const EMY_FIELD: &str = "emy";

/// A single patient record. Opaque to this service and passed through as-is.
pub type EmyRecord = Value;

/// Parse an upstream body and return the `emy` records in upstream order.
///
/// Keys of the `emy` object are discarded. Order follows the body as
/// received (`serde_json` is built with `preserve_order`); nothing is sorted.
/// A body whose `emy` is already an array is returned unchanged.
pub fn extract_records(body: &[u8]) -> Result<Vec<EmyRecord>, UpstreamError> {
    let value: Value = serde_json::from_slice(body)?;
    let mut root = match value {
        Value::Object(root) => root,
        other => {
            return Err(UpstreamError::NotAnObject {
                found: json_type_name(&other),
            })
        }
    };

    match root.remove(EMY_FIELD) {
        Some(Value::Object(records)) => Ok(into_values(records)),
        Some(Value::Array(records)) => Ok(records),
        Some(other) => Err(UpstreamError::InvalidField {
            field: EMY_FIELD,
            found: json_type_name(&other),
        }),
        None => Err(UpstreamError::MissingField { field: EMY_FIELD }),
    }
}

fn into_values(records: Map<String, Value>) -> Vec<EmyRecord> {
    records.into_iter().map(|(_, record)| record).collect()
}

/// Human-readable JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
