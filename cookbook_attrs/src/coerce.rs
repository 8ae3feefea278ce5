//! Conversion of raw layer and default data into declared attribute kinds.
//!
//! Strings are only reinterpreted when they match a literal exactly: `"true"`
//! and `"false"` for booleans, `-?digits` and `-?digits.digits` for numbers.
//! Anything else is reported as a mismatch rather than guessed at.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Number, Value};

use crate::path::AttrPath;
use crate::value::{AttrValue, AttributeKind, ScalarType, raw_kind};
use crate::{AttrError, AttrResult};

/// Coerce `raw` into `kind` on behalf of the attribute at `path`.
///
/// # Errors
///
/// Returns [`AttrError::TypeMismatch`] when `raw` cannot represent `kind`.
///
/// # Examples
///
/// ```
/// use cookbook_attrs::{AttrPath, AttrValue, AttributeKind, ScalarType, coerce};
/// use serde_json::json;
///
/// let path = AttrPath::parse("rvm/install_rubies")?;
/// let kind = AttributeKind::Scalar(ScalarType::Boolean);
/// assert_eq!(coerce(&path, &json!("true"), kind)?, AttrValue::Bool(true));
/// assert!(coerce(&path, &json!("yes"), kind).is_err());
/// # Ok::<_, std::sync::Arc<cookbook_attrs::AttrError>>(())
/// ```
pub fn coerce(path: &AttrPath, raw: &Value, kind: AttributeKind) -> AttrResult<AttrValue> {
    let coerced = match kind {
        AttributeKind::Scalar(scalar) => coerce_scalar(raw, scalar),
        AttributeKind::Sequence => match raw {
            Value::Array(items) => items
                .iter()
                .map(structural)
                .collect::<Option<Vec<_>>>()
                .map(AttrValue::Sequence),
            _ => None,
        },
        AttributeKind::Mapping => match raw {
            Value::Object(entries) => mapping(entries).map(AttrValue::Mapping),
            _ => None,
        },
    };
    coerced.ok_or_else(|| mismatch(path, kind, raw))
}

fn mismatch(path: &AttrPath, expected: AttributeKind, raw: &Value) -> Arc<AttrError> {
    Arc::new(AttrError::TypeMismatch {
        path: path.clone(),
        expected,
        got: nested_mismatch(raw).unwrap_or_else(|| raw_kind(raw)),
    })
}

/// Report `null` when a collection was rejected because of a null member.
fn nested_mismatch(raw: &Value) -> Option<&'static str> {
    let has_null = match raw {
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(entries) => entries.values().any(contains_null),
        _ => false,
    };
    has_null.then_some("null")
}

fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(entries) => entries.values().any(contains_null),
        _ => false,
    }
}

fn coerce_scalar(raw: &Value, scalar: ScalarType) -> Option<AttrValue> {
    match (scalar, raw) {
        (ScalarType::Any, Value::String(text)) => Some(AttrValue::String(text.clone())),
        (ScalarType::Any | ScalarType::Boolean, Value::Bool(flag)) => Some(AttrValue::Bool(*flag)),
        (ScalarType::Any | ScalarType::Numeric, Value::Number(number)) => number_value(number),
        (ScalarType::String, Value::String(text)) => Some(AttrValue::String(text.clone())),
        (ScalarType::String, Value::Bool(flag)) => Some(AttrValue::String(flag.to_string())),
        (ScalarType::String, Value::Number(number)) => Some(AttrValue::String(number.to_string())),
        (ScalarType::Boolean, Value::String(text)) => parse_bool(text).map(AttrValue::Bool),
        (ScalarType::Numeric, Value::String(text)) => parse_number(text),
        _ => None,
    }
}

/// Integers outside the `i64` range are rejected rather than widened to a
/// lossy decimal, matching what [`parse_number`] does for the same digits.
fn number_value(number: &Number) -> Option<AttrValue> {
    if let Some(integer) = number.as_i64() {
        return Some(AttrValue::Integer(integer));
    }
    if number.is_f64() {
        return number.as_f64().map(AttrValue::Decimal);
    }
    None
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

fn parse_number(text: &str) -> Option<AttrValue> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    if is_digits(unsigned) {
        return text.parse::<i64>().ok().map(AttrValue::Integer);
    }
    let (whole, fraction) = unsigned.split_once('.')?;
    if is_digits(whole) && is_digits(fraction) {
        return text.parse::<f64>().ok().map(AttrValue::Decimal);
    }
    None
}

/// Convert nested data without reinterpreting strings; `null` is rejected.
fn structural(raw: &Value) -> Option<AttrValue> {
    match raw {
        Value::Null => None,
        Value::Bool(flag) => Some(AttrValue::Bool(*flag)),
        Value::Number(number) => number_value(number),
        Value::String(text) => Some(AttrValue::String(text.clone())),
        Value::Array(items) => items
            .iter()
            .map(structural)
            .collect::<Option<Vec<_>>>()
            .map(AttrValue::Sequence),
        Value::Object(entries) => mapping(entries).map(AttrValue::Mapping),
    }
}

fn mapping(entries: &Map<String, Value>) -> Option<BTreeMap<String, AttrValue>> {
    entries
        .iter()
        .map(|(key, value)| structural(value).map(|converted| (key.clone(), converted)))
        .collect()
}
