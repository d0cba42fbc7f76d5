//! Lenient field decoders
//!
//! Upstream field types drift between chains: account chains send wei-scale
//! amounts as decimal strings, some counters arrive as strings, and some
//! strings arrive as numbers. A field that cannot be read is absent; it never
//! fails the record it belongs to.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode `T` from its JSON form or from a string holding it.
/// Anything else decodes as `None`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromStr,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(coerce))
}

/// Decode a string field, accepting numbers and booleans in their JSON text form.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn coerce<T>(value: Value) -> Option<T>
where
    T: DeserializeOwned + FromStr,
{
    match value {
        Value::String(s) => s.trim().parse().ok(),
        other => serde_json::from_value(other).ok(),
    }
}
