//! Decoding of the InSight report payload.
//!
//! The payload's top-level object lists its sol keys in `sol_keys` and stores
//! each sol under a field named by one of those keys. The second-level field
//! names are data, so the payload is decoded into a [`serde_json::Value`] tree
//! first and each sol is then looked up by its runtime key.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{SolMeasurements, SolReport};

/// Top-level field holding the ordered sol keys.
pub const SOL_KEYS_FIELD: &str = "sol_keys";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed report payload: {0}")]
    Malformed(String),

    #[error("report payload has no `{}` array of strings", SOL_KEYS_FIELD)]
    MissingKeyList,

    #[error("sol `{key}` has a field of the wrong type: {source}")]
    FieldTypeMismatch {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode a raw report payload.
///
/// Declared keys without a matching top-level field are left out of
/// [`SolReport::sols`] but kept in [`SolReport::sol_keys`]. A type mismatch in
/// any published sol fails the whole decode.
pub fn decode_report(bytes: &[u8]) -> Result<SolReport, DecodeError> {
    let root: Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let object = match root {
        Value::Object(object) => object,
        other => {
            return Err(DecodeError::Malformed(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(&other)
            )));
        }
    };

    let sol_keys = declared_sol_keys(&object)?;

    let mut sols = HashMap::with_capacity(sol_keys.len());
    for key in &sol_keys {
        if let Some(sol) = decode_keyed::<SolMeasurements>(&object, key)? {
            sols.insert(key.clone(), sol);
        }
    }

    Ok(SolReport { sol_keys, sols })
}

/// Decode the object field named `key` of `object` as `T`.
///
/// Returns `Ok(None)` when the field is absent. A present field that is not a
/// JSON object, including an explicit `null` or an array, or that does not
/// decode as `T`, is a [`DecodeError::FieldTypeMismatch`].
pub fn decode_keyed<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &str,
) -> Result<Option<T>, DecodeError> {
    let Some(value) = object.get(key) else {
        return Ok(None);
    };

    if !value.is_object() {
        return Err(DecodeError::FieldTypeMismatch {
            key: key.to_owned(),
            source: serde::de::Error::custom(format!(
                "expected an object, found {}",
                json_kind(value)
            )),
        });
    }

    <T as serde::Deserialize>::deserialize(value)
        .map(Some)
        .map_err(|source| DecodeError::FieldTypeMismatch { key: key.to_owned(), source })
}

fn declared_sol_keys(object: &Map<String, Value>) -> Result<Vec<String>, DecodeError> {
    let Some(Value::Array(items)) = object.get(SOL_KEYS_FIELD) else {
        return Err(DecodeError::MissingKeyList);
    };

    items
        .iter()
        .map(|item| item.as_str().map(str::to_owned).ok_or(DecodeError::MissingKeyList))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
