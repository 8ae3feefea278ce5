//! Attribute resolution across override layers and schema defaults.
//!
//! A lookup walks the layer stack highest precedence first. The first layer
//! holding the path wins and its raw value is coerced to the declared kind;
//! a coercion failure ends the lookup rather than falling through to lower
//! layers. With no layer match the declaration's default applies, following
//! references to other attributes through this same procedure. Each lookup
//! keeps its own chain of in-flight paths to detect reference cycles, so
//! resolvers can be used from many threads at once.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce::coerce;
use crate::layers::LayerStack;
use crate::path::AttrPath;
use crate::schema::{AttributeDeclaration, DefaultExpr, SchemaStore};
use crate::value::AttrValue;
use crate::{AttrError, AttrResult};

/// Where a resolved value came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionSource {
    /// An override layer supplied the value.
    Layer {
        /// Layer name.
        name: String,
        /// Layer precedence.
        precedence: i32,
    },
    /// The declaration's literal default.
    SchemaDefault,
    /// A default that follows one or more other attributes.
    ResolvedReference,
    /// Nothing supplied a value and there is no default.
    Unset,
}

impl ResolutionSource {
    /// Stable label: the layer name, `schema-default`, `resolved-reference`
    /// or `unset`.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Layer { name, .. } => name,
            Self::SchemaDefault => "schema-default",
            Self::ResolvedReference => "resolved-reference",
            Self::Unset => "unset",
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layer { name, precedence } => write!(f, "{name} ({precedence})"),
            other => f.write_str(other.label()),
        }
    }
}

impl Serialize for ResolutionSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// The effective value of one attribute.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedAttribute {
    path: AttrPath,
    value: Option<AttrValue>,
    source: ResolutionSource,
}

impl ResolvedAttribute {
    /// Attribute path.
    #[must_use]
    pub const fn path(&self) -> &AttrPath {
        &self.path
    }

    /// Coerced value; `None` when nothing supplied one.
    #[must_use]
    pub const fn value(&self) -> Option<&AttrValue> {
        self.value.as_ref()
    }

    /// Consume the resolution, keeping only the value.
    #[must_use]
    pub fn into_value(self) -> Option<AttrValue> {
        self.value
    }

    /// Where the value came from.
    #[must_use]
    pub const fn source(&self) -> &ResolutionSource {
        &self.source
    }
}

/// Read-only resolution over a schema and a layer stack.
///
/// # Examples
///
/// ```
/// use cookbook_attrs::{
///     AttrPath, AttrValue, AttributeDeclaration, AttributeKind, DefaultExpr, LayerStack,
///     OverrideLayer, Resolver, SchemaStore,
/// };
/// use serde_json::json;
///
/// let default_ruby = AttrPath::parse("rvm/default_ruby")?;
/// let rubies = AttrPath::parse("rvm/rubies")?;
///
/// let mut schema = SchemaStore::new();
/// schema.register(
///     AttributeDeclaration::new(default_ruby.clone(), AttributeKind::SCALAR)
///         .with_literal_default("ruby-1.9.2-p180"),
/// )?;
/// schema.register(
///     AttributeDeclaration::new(rubies.clone(), AttributeKind::Sequence)
///         .with_default(DefaultExpr::from_raw(json!(["ref(rvm/default_ruby)"]))),
/// )?;
/// schema.seal();
///
/// let mut layers = LayerStack::new();
/// layers.push(OverrideLayer::new("production", 10).with_entry(&default_ruby, json!("ruby-2.0.0")))?;
/// layers.seal_all();
///
/// let resolver = Resolver::new(&schema, &layers);
/// let resolved = resolver.resolve(&rubies)?;
/// assert_eq!(resolved.value(), Some(&AttrValue::from(vec!["ruby-2.0.0"])));
/// assert_eq!(resolved.source().label(), "resolved-reference");
/// # Ok::<_, std::sync::Arc<cookbook_attrs::AttrError>>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    schema: &'a SchemaStore,
    layers: &'a LayerStack,
}

impl<'a> Resolver<'a> {
    /// Borrow a schema and layer stack for resolution.
    ///
    /// Both should be sealed first; the resolver never mutates either.
    #[must_use]
    pub const fn new(schema: &'a SchemaStore, layers: &'a LayerStack) -> Self {
        Self { schema, layers }
    }

    /// Resolve the effective value of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::UnknownAttribute`] for undeclared paths (including
    /// dangling default references), [`AttrError::TypeMismatch`] when the
    /// winning value does not fit the declared kind,
    /// [`AttrError::InvalidChoice`] when it is not an allowed choice, and
    /// [`AttrError::CyclicDefault`] when default references loop.
    pub fn resolve(&self, path: &AttrPath) -> AttrResult<ResolvedAttribute> {
        let mut chain = Vec::new();
        self.resolve_in(path, &mut chain)
    }

    /// Resolve every declared attribute in path order.
    ///
    /// # Errors
    ///
    /// Every failing attribute is reported; several failures are returned as
    /// [`AttrError::Aggregate`].
    pub fn resolve_all(&self) -> AttrResult<Vec<ResolvedAttribute>> {
        let mut resolved = Vec::with_capacity(self.schema.len());
        let mut errors = Vec::new();
        for declaration in self.schema {
            match self.resolve(declaration.path()) {
                Ok(attribute) => resolved.push(attribute),
                Err(err) => errors.push(err),
            }
        }
        AttrError::collect_shared(errors).map_or(Ok(resolved), Err)
    }

    fn resolve_in(&self, path: &AttrPath, chain: &mut Vec<AttrPath>) -> AttrResult<ResolvedAttribute> {
        let declaration = self.schema.get(path)?;

        for layer in self.layers.layers_descending() {
            let Some(raw) = layer.get(path) else {
                continue;
            };
            let value = coerce(path, raw, declaration.kind())?;
            check_choice(declaration, &value)?;
            tracing::trace!(path = %path, layer = layer.name(), "resolved from override layer");
            return Ok(ResolvedAttribute {
                path: path.clone(),
                value: Some(value),
                source: ResolutionSource::Layer {
                    name: layer.name().to_owned(),
                    precedence: layer.precedence(),
                },
            });
        }

        let Some(default) = declaration.default() else {
            tracing::trace!(path = %path, "no layer value and no default");
            return Ok(ResolvedAttribute {
                path: path.clone(),
                value: None,
                source: ResolutionSource::Unset,
            });
        };

        chain.push(path.clone());
        let evaluated = self.evaluate(default, chain);
        chain.pop();
        let raw = evaluated?;

        let source = if default.is_literal() {
            ResolutionSource::SchemaDefault
        } else {
            ResolutionSource::ResolvedReference
        };
        let value = match raw {
            Value::Null => None,
            present => {
                let coerced = coerce(path, &present, declaration.kind())?;
                check_choice(declaration, &coerced)?;
                Some(coerced)
            }
        };
        tracing::trace!(path = %path, source = source.label(), "resolved from default");
        Ok(ResolvedAttribute {
            path: path.clone(),
            value,
            source,
        })
    }

    /// Turn a default expression into raw data, resolving references.
    ///
    /// Unset references yield `null` at the top level and are dropped from
    /// composites.
    fn evaluate(&self, expr: &DefaultExpr, chain: &mut Vec<AttrPath>) -> AttrResult<Value> {
        match expr {
            DefaultExpr::Literal(raw) => Ok(raw.clone()),
            DefaultExpr::Reference(target) => {
                if chain.contains(target) {
                    return Err(cycle_error(chain, target));
                }
                let resolved = self.resolve_in(target, chain)?;
                Ok(resolved.value().map_or(Value::Null, AttrValue::to_json))
            }
            DefaultExpr::Sequence(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    let raw = self.evaluate(item, chain)?;
                    if !raw.is_null() {
                        values.push(raw);
                    }
                }
                Ok(Value::Array(values))
            }
            DefaultExpr::Mapping(entries) => {
                let mut values = Map::new();
                for (key, entry) in entries {
                    let raw = self.evaluate(entry, chain)?;
                    if !raw.is_null() {
                        values.insert(key.clone(), raw);
                    }
                }
                Ok(Value::Object(values))
            }
        }
    }
}

fn cycle_error(chain: &[AttrPath], target: &AttrPath) -> Arc<AttrError> {
    let start = chain.iter().position(|entry| entry == target).unwrap_or(0);
    let mut cycle: Vec<String> = chain
        .get(start..)
        .unwrap_or_default()
        .iter()
        .map(ToString::to_string)
        .collect();
    cycle.push(target.to_string());
    Arc::new(AttrError::CyclicDefault {
        cycle: cycle.join(" -> "),
    })
}

fn check_choice(declaration: &AttributeDeclaration, value: &AttrValue) -> AttrResult<()> {
    let choices = declaration.choices();
    if choices.is_empty() || choices.contains(value) {
        return Ok(());
    }
    Err(Arc::new(AttrError::InvalidChoice {
        path: declaration.path().clone(),
        value: value.to_string(),
    }))
}

#[cfg(test)]
mod tests;
