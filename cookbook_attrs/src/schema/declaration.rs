//! Attribute declarations held by the schema store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DefaultExpr;
use crate::coerce::coerce;
use crate::path::AttrPath;
use crate::value::{AttrValue, AttributeKind};
use crate::AttrResult;

/// How strongly a consumer is expected to set an attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    /// The attribute must be supplied by a layer.
    Required,
    /// Supplying the attribute is advised.
    Recommended,
    /// The default is usually good enough.
    #[default]
    Optional,
}

/// Immutable description of one attribute.
///
/// # Examples
///
/// ```
/// use cookbook_attrs::{AttrPath, AttributeDeclaration, AttributeKind};
///
/// let decl = AttributeDeclaration::new(AttrPath::parse("rvm/rubies")?, AttributeKind::Sequence)
///     .with_display_name("Installed RVM rubies")
///     .with_default_ref(AttrPath::parse("rvm/default_ruby")?);
/// assert_eq!(decl.kind(), AttributeKind::Sequence);
/// assert!(decl.default().is_some());
/// # Ok::<_, std::sync::Arc<cookbook_attrs::AttrError>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDeclaration {
    path: AttrPath,
    display_name: String,
    description: String,
    kind: AttributeKind,
    default: Option<DefaultExpr>,
    choices: Vec<AttrValue>,
    requirement: Requirement,
    recipes: Vec<String>,
    calculated: bool,
}

impl AttributeDeclaration {
    /// Declare an attribute with no default.
    #[must_use]
    pub fn new(path: AttrPath, kind: AttributeKind) -> Self {
        Self {
            path,
            display_name: String::new(),
            description: String::new(),
            kind,
            default: None,
            choices: Vec::new(),
            requirement: Requirement::default(),
            recipes: Vec::new(),
            calculated: false,
        }
    }

    /// Set the human-readable name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Set the long description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the default expression.
    #[must_use]
    pub fn with_default(mut self, default: DefaultExpr) -> Self {
        self.default = Some(default);
        self
    }

    /// Use raw data as a literal default, without scanning for references.
    #[must_use]
    pub fn with_literal_default(self, raw: impl Into<Value>) -> Self {
        self.with_default(DefaultExpr::Literal(raw.into()))
    }

    /// Default to the resolved value of `target`.
    #[must_use]
    pub fn with_default_ref(self, target: AttrPath) -> Self {
        self.with_default(DefaultExpr::Reference(target))
    }

    /// Restrict resolved values to `choices`.
    #[must_use]
    pub fn with_choices(mut self, choices: Vec<AttrValue>) -> Self {
        self.choices = choices;
        self
    }

    /// Set the requirement level.
    #[must_use]
    pub const fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = requirement;
        self
    }

    /// Record the recipes that read this attribute.
    #[must_use]
    pub fn with_recipes(mut self, recipes: Vec<String>) -> Self {
        self.recipes = recipes;
        self
    }

    /// Mark the attribute as computed by recipes rather than configured.
    #[must_use]
    pub const fn with_calculated(mut self, calculated: bool) -> Self {
        self.calculated = calculated;
        self
    }

    /// Attribute path.
    #[must_use]
    pub const fn path(&self) -> &AttrPath {
        &self.path
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Long description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared kind.
    #[must_use]
    pub const fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Default expression, if any.
    #[must_use]
    pub const fn default(&self) -> Option<&DefaultExpr> {
        self.default.as_ref()
    }

    /// Allowed values; empty means unrestricted.
    #[must_use]
    pub fn choices(&self) -> &[AttrValue] {
        &self.choices
    }

    /// Requirement level.
    #[must_use]
    pub const fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// Recipes reading the attribute.
    #[must_use]
    pub fn recipes(&self) -> &[String] {
        &self.recipes
    }

    /// Whether recipes compute the value.
    #[must_use]
    pub const fn is_calculated(&self) -> bool {
        self.calculated
    }

    /// Check that a literal default fits the declared kind.
    ///
    /// Templates containing references are only checked once resolved.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AttrError::TypeMismatch`] when the literal does not
    /// coerce.
    pub fn validate_default(&self) -> AttrResult<()> {
        if let Some(DefaultExpr::Literal(raw)) = &self.default {
            coerce(&self.path, raw, self.kind)?;
        }
        Ok(())
    }
}
