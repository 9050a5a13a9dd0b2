//! JSON encoding shared by every request and response body.
//!
//! Field naming and enum spelling come from the serde attributes on the
//! resource types. `encode` additionally drops `null` object members at any
//! depth, which covers pass-through members that no typed field guards.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;

pub const CONTENT_TYPE: &str = "application/json";

/// Serialize a request payload.
pub fn encode<T: Serialize>(value: &T) -> Result<String, ClientError> {
    let mut json = serde_json::to_value(value).map_err(|e| ClientError::Serialization(e.to_string()))?;
    strip_nulls(&mut json);
    serde_json::to_string(&json).map_err(|e| ClientError::Serialization(e.to_string()))
}

/// Deserialize a response body.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Serialization(e.to_string()))
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
