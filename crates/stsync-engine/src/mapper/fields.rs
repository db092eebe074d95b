//! Reading loosely-typed fields out of source documents.

use serde_json::Value;

/// Identifier-like value as a string: non-empty strings as-is, integers in
/// decimal. Anything else is treated as absent.
pub fn as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite() && f.fract().abs() < f64::EPSILON)
            .map(|f| format!("{f:.0}")),
        _ => None,
    }
}

/// First present identifier among `keys`.
pub fn first_id(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| record.get(*key).and_then(as_id))
}

/// First non-empty string among `keys`.
pub fn first_str(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        record
            .get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// First numeric value among `keys`. Numeric strings count.
pub fn first_f64(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Identifier of a nested object, e.g. `vendor.id`.
pub fn nested_id(record: &Value, object: &str) -> Option<String> {
    record.get(object).and_then(|o| o.get("id")).and_then(as_id)
}

/// Identifier of a source document or a create response: `id`, else `guid`,
/// else `externalId`.
pub fn record_id(record: &Value) -> Option<String> {
    first_id(record, &["id", "guid", "externalId"])
}
