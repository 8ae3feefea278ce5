//! Default expressions: literals, references and templates mixing the two.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::path::AttrPath;

/// How an attribute computes its default when no layer supplies a value.
///
/// Composite defaults may embed references, as in the `rvm/rubies` default
/// `["ref(rvm/default_ruby)"]`, which tracks whatever `rvm/default_ruby`
/// resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum DefaultExpr {
    /// Raw data coerced to the declared kind.
    Literal(Value),
    /// The resolved value of another attribute.
    Reference(AttrPath),
    /// A list whose elements include at least one reference.
    Sequence(Vec<DefaultExpr>),
    /// A map whose values include at least one reference.
    Mapping(BTreeMap<String, DefaultExpr>),
}

impl DefaultExpr {
    /// Parse raw manifest data, recognising reference strings at any depth.
    ///
    /// Composites without references collapse back into a single literal.
    ///
    /// # Examples
    ///
    /// ```
    /// use cookbook_attrs::{AttrPath, DefaultExpr};
    /// use serde_json::json;
    ///
    /// let expr = DefaultExpr::from_raw(json!(["node[:rvm][:default_ruby]"]));
    /// let target = AttrPath::parse("rvm/default_ruby")?;
    /// assert_eq!(expr.references(), vec![&target]);
    ///
    /// let literal = DefaultExpr::from_raw(json!([{ "name": "bundler" }]));
    /// assert!(literal.is_literal());
    /// # Ok::<_, std::sync::Arc<cookbook_attrs::AttrError>>(())
    /// ```
    #[must_use]
    pub fn from_raw(raw: Value) -> Self {
        match raw {
            Value::String(text) => {
                if let Some(target) = parse_reference(&text) {
                    Self::Reference(target)
                } else {
                    Self::Literal(Value::String(text))
                }
            }
            Value::Array(items) => {
                let exprs: Vec<Self> = items.into_iter().map(Self::from_raw).collect();
                if exprs.iter().all(Self::is_literal) {
                    Self::Literal(Value::Array(
                        exprs.into_iter().filter_map(Self::into_literal).collect(),
                    ))
                } else {
                    Self::Sequence(exprs)
                }
            }
            Value::Object(entries) => {
                let exprs: BTreeMap<String, Self> = entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from_raw(value)))
                    .collect();
                if exprs.values().all(Self::is_literal) {
                    Self::Literal(Value::Object(
                        exprs
                            .into_iter()
                            .filter_map(|(key, expr)| expr.into_literal().map(|raw| (key, raw)))
                            .collect(),
                    ))
                } else {
                    Self::Mapping(exprs)
                }
            }
            other => Self::Literal(other),
        }
    }

    /// Whether the expression is plain data with no references.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    fn into_literal(self) -> Option<Value> {
        match self {
            Self::Literal(raw) => Some(raw),
            _ => None,
        }
    }

    /// Every attribute path referenced by the expression, in document order.
    #[must_use]
    pub fn references(&self) -> Vec<&AttrPath> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references<'a>(&'a self, found: &mut Vec<&'a AttrPath>) {
        match self {
            Self::Literal(_) => {}
            Self::Reference(target) => found.push(target),
            Self::Sequence(items) => {
                for item in items {
                    item.collect_references(found);
                }
            }
            Self::Mapping(entries) => {
                for entry in entries.values() {
                    entry.collect_references(found);
                }
            }
        }
    }
}

impl From<AttrPath> for DefaultExpr {
    fn from(target: AttrPath) -> Self {
        Self::Reference(target)
    }
}

/// Recognise a reference string.
///
/// Two spellings are accepted: `ref(rvm/default_ruby)` and the node index
/// form `node[:rvm][:default_ruby]` (segments may also be quoted, as in
/// `node['rvm']["default_ruby"]`). Anything else, including malformed
/// references, is not a reference.
#[must_use]
pub fn parse_reference(text: &str) -> Option<AttrPath> {
    let trimmed = text.trim();
    if let Some(inner) = trimmed
        .strip_prefix("ref(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return AttrPath::parse(inner).ok();
    }

    let mut rest = trimmed.strip_prefix("node")?;
    let mut segments = Vec::new();
    while !rest.is_empty() {
        let (segment, tail) = rest.strip_prefix('[')?.split_once(']')?;
        segments.push(index_segment(segment)?);
        rest = tail;
    }
    AttrPath::new(segments).ok()
}

fn index_segment(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let name = trimmed
        .strip_prefix(':')
        .or_else(|| trimmed.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))?;
    (!name.is_empty()).then_some(name)
}
