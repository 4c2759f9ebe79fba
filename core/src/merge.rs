//! Deep merge of persisted JSON over default records.
//!
//! Objects merge key by key. Anything else on the persisted side
//! (scalars, arrays, null) replaces the default outright. Keys the
//! persisted side lacks keep their default value, which is what lets
//! an older payload load after new fields were added to a record.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut out), Value::Object(source)) => {
            for (key, value) in source {
                let merged = match out.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                out.insert(key, merged);
            }
            Value::Object(out)
        }
        (_, source) => source,
    }
}

/// Serialize `default`, merge `persisted` over it, and decode the result.
pub fn merge_over_default<T>(default: &T, persisted: Value) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let base = serde_json::to_value(default)?;
    serde_json::from_value(deep_merge(base, persisted))
}
