//! Attribute records as written in manifests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::coerce;
use crate::path::AttrPath;
use crate::schema::{AttributeDeclaration, DefaultExpr, Requirement};
use crate::value::AttributeKind;
use crate::{AttrError, AttrResult};

fn scalar_kind() -> String {
    AttributeKind::SCALAR.as_str().to_owned()
}

/// One attribute entry of a manifest.
///
/// `default` holds raw data; strings such as `ref(rvm/default_ruby)` or
/// `node[:rvm][:default_ruby]` become references, at any depth inside arrays
/// and hashes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRecord {
    /// Slash- or dot-delimited attribute path.
    pub path: String,
    /// Human-readable name.
    #[serde(default, alias = "display_name")]
    pub display_name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Kind name; `type` is accepted as well.
    #[serde(default = "scalar_kind", alias = "type")]
    pub kind: String,
    /// Raw default data; absent or `null` means no default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values.
    #[serde(default, alias = "choices", skip_serializing_if = "Vec::is_empty")]
    pub choice: Vec<Value>,
    /// Requirement level.
    #[serde(default)]
    pub required: Requirement,
    /// Recipes reading the attribute.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipes: Vec<String>,
    /// Whether the default is computed by the package at runtime.
    #[serde(default)]
    pub calculated: bool,
}

impl AttributeRecord {
    /// Convert the record into a declaration.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::InvalidPath`], [`AttrError::InvalidKind`], or
    /// [`AttrError::TypeMismatch`] when a choice or literal default does not
    /// fit the kind.
    pub fn to_declaration(&self) -> AttrResult<AttributeDeclaration> {
        let path = AttrPath::parse(&self.path)?;
        let kind: AttributeKind = self.kind.parse().map_err(|_| {
            Arc::new(AttrError::InvalidKind {
                path: self.path.clone(),
                kind: self.kind.clone(),
            })
        })?;
        let choices = self
            .choice
            .iter()
            .map(|raw| coerce(&path, raw, kind))
            .collect::<AttrResult<Vec<_>>>()?;

        let mut declaration = AttributeDeclaration::new(path, kind)
            .with_display_name(self.display_name.as_str())
            .with_description(self.description.as_str())
            .with_choices(choices)
            .with_requirement(self.required)
            .with_recipes(self.recipes.clone())
            .with_calculated(self.calculated);
        if let Some(raw) = self.default.clone() {
            declaration = declaration.with_default(DefaultExpr::from_raw(raw));
        }
        declaration.validate_default()?;
        Ok(declaration)
    }
}
