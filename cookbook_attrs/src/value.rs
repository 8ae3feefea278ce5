//! Declared attribute kinds and coerced attribute values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Natural representation requested for a scalar attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ScalarType {
    /// Strings, booleans and numbers are kept exactly as supplied.
    #[default]
    Any,
    /// Text; numbers and booleans are rendered to their literal form.
    String,
    /// `true`/`false`, accepting only those exact strings.
    Boolean,
    /// Integers or decimals, accepting only plain numeric strings.
    Numeric,
}

/// Declared shape of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// A single string, number or boolean.
    Scalar(ScalarType),
    /// A list of values.
    Sequence,
    /// A string-keyed map of values.
    Mapping,
}

impl AttributeKind {
    /// Shorthand for an untyped scalar.
    pub const SCALAR: Self = Self::Scalar(ScalarType::Any);

    /// Manifest spelling of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar(ScalarType::Any) => "scalar",
            Self::Scalar(ScalarType::String) => "string",
            Self::Scalar(ScalarType::Boolean) => "boolean",
            Self::Scalar(ScalarType::Numeric) => "numeric",
            Self::Sequence => "array",
            Self::Mapping => "hash",
        }
    }
}

impl Default for AttributeKind {
    fn default() -> Self {
        Self::SCALAR
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown attribute kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for AttributeKind {
    type Err = UnknownKind;

    /// Parse manifest kind names, case-insensitively.
    ///
    /// `symbol` is treated as a string scalar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" => Ok(Self::SCALAR),
            "string" | "symbol" => Ok(Self::Scalar(ScalarType::String)),
            "boolean" | "bool" => Ok(Self::Scalar(ScalarType::Boolean)),
            "numeric" | "number" => Ok(Self::Scalar(ScalarType::Numeric)),
            "array" | "sequence" => Ok(Self::Sequence),
            "hash" | "mapping" => Ok(Self::Mapping),
            _ => Err(UnknownKind(s.to_owned())),
        }
    }
}

/// An attribute value after coercion to its declared kind.
///
/// Values serialise to plain JSON (`"ruby-2.0.0"`, `true`, `["a"]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Integer(i64),
    /// Decimal scalar.
    Decimal(f64),
    /// Text scalar.
    String(String),
    /// Ordered list.
    Sequence(Vec<AttrValue>),
    /// String-keyed map, ordered by key.
    Mapping(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// Borrow the text of a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Boolean scalar value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Integer scalar value.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(number) => Some(*number),
            _ => None,
        }
    }

    /// Borrow the elements of a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the entries of a mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Convert back into raw JSON, e.g. to splice into a default template.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Integer(number) => Value::from(*number),
            Self::Decimal(number) => Value::from(*number),
            Self::String(text) => Value::String(text.clone()),
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Mapping(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for AttrValue {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// Name of a raw JSON value's shape, as reported in type mismatches.
#[must_use]
pub const fn raw_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "hash",
    }
}
