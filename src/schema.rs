//! Schema adapter: validate inbound payloads into typed records and encode
//! typed records into response bodies.
//!
//! Records cross the storage boundary as [`Fields`] (a JSON object); the
//! typed schema is applied on the way in and on the way out.

use crate::error::AppError;
use crate::store::{Fields, StorageError};
use axum::body::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// A typed record shape usable as a read, create or update schema.
pub trait Schema: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Schema for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Deserialize and type-check a request body. Unknown fields are ignored
/// unless the schema itself denies them; missing required fields fail.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, AppError> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::Validation("request body is required".into()));
    }
    let value: Value = serde_json::from_slice(payload)
        .map_err(|e| AppError::Validation(format!("invalid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(AppError::Validation("request body must be a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| AppError::Validation(e.to_string()))
}

/// Serialize a record (or a slice of records) in schema field order.
pub fn encode<T: Serialize + ?Sized>(record: &T) -> Result<Bytes, AppError> {
    serde_json::to_vec(record)
        .map(Bytes::from)
        .map_err(|e| AppError::Internal(format!("encode: {}", e)))
}

/// Flatten a typed record into storage fields.
pub fn to_fields<T: Serialize>(record: &T) -> Result<Fields, AppError> {
    match serde_json::to_value(record).map_err(|e| AppError::Internal(format!("encode: {}", e)))? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Internal(format!(
            "schema must serialize to an object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Rebuild a typed record from storage fields. A mismatch here means the
/// store returned something the read schema does not describe.
pub fn from_fields<T: DeserializeOwned>(fields: Fields) -> Result<T, StorageError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| StorageError::Malformed(e.to_string()))
}

/// Overlay `patch` onto `base`; keys absent from `patch` keep their value.
pub fn merge(base: &mut Fields, patch: Fields) {
    for (k, v) in patch {
        base.insert(k, v);
    }
}

/// Drop explicit nulls so that an update only touches the fields it sets.
pub fn strip_nulls(fields: &mut Fields) {
    fields.retain(|_, v| !v.is_null());
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
