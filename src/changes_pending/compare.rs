//! Empty-tolerant value comparison.
//!
//! Server round-trips routinely turn a missing field into `""`, `null` or
//! `[]`. These helpers treat such values as interchangeable while keeping
//! `0` and `false` significant.

use serde_json::{Map, Value};

/// Whether a value counts as "empty" for change detection.
///
/// Absent, `null`, `""`, `[]` and `{}` are empty. Numbers and booleans never
/// are, so `0` and `false` always take part in a comparison.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(fields)) => fields.is_empty(),
        Some(Value::Number(_)) | Some(Value::Bool(_)) => false,
    }
}

/// Compare two property values, ignoring empty-value noise.
///
/// `None` stands for an absent property.
///
/// 1. Two structured values (object or array) have their empty members
///    stripped one level deep before a structural comparison. Array
///    positions are kept, so an empty element only matches another empty
///    element.
/// 2. Two empty values are equal.
/// 3. Anything else is compared structurally.
pub fn values_equivalent(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) if is_structured(a) && is_structured(b) => stripped_equal(a, b),
        _ if is_empty_value(a) && is_empty_value(b) => true,
        (Some(a), Some(b)) => structurally_equal(a, b),
        _ => false,
    }
}

/// Compare a single property of two objects with [`values_equivalent`].
pub fn compare_property(property: &str, obj_a: &Map<String, Value>, obj_b: &Map<String, Value>) -> bool {
    values_equivalent(obj_a.get(property), obj_b.get(property))
}

/// True if any watched property differs between `baseline` and `candidate`.
pub fn has_changes(
    watched_properties: &[String],
    baseline: &Map<String, Value>,
    candidate: &Map<String, Value>,
) -> bool {
    watched_properties
        .iter()
        .any(|property| !compare_property(property, baseline, candidate))
}

/// Deep structural equality.
///
/// Object key order is irrelevant and numbers compare by value, so `1` and
/// `1.0` are equal.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| structurally_equal(x, y)))
        }
        _ => false,
    }
}

fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn numbers_equal(x: &serde_json::Number, y: &serde_json::Number) -> bool {
    if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
        return x == y;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Structural equality after dropping empty members one level deep.
fn stripped_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(xs), Value::Object(ys)) => {
            let kept_a = non_empty_fields(xs);
            let kept_b = non_empty_fields(ys);
            kept_a.len() == kept_b.len()
                && kept_a
                    .iter()
                    .all(|(key, x)| ys.get(*key).is_some_and(|y| structurally_equal(x, y)))
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len()
                && xs.iter().zip(ys).all(|(x, y)| {
                    match (is_empty_value(Some(x)), is_empty_value(Some(y))) {
                        (true, true) => true,
                        (false, false) => structurally_equal(x, y),
                        _ => false,
                    }
                })
        }
        _ => false,
    }
}

fn non_empty_fields(fields: &Map<String, Value>) -> Vec<(&String, &Value)> {
    fields
        .iter()
        .filter(|(_, value)| !is_empty_value(Some(value)))
        .collect()
}
