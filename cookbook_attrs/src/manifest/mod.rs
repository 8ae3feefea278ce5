//! Cookbook manifests: package metadata plus attribute records.
//!
//! A manifest mirrors a cookbook's metadata file. Metadata is carried through
//! untouched; attribute records become [`AttributeDeclaration`]s in a sealed
//! [`SchemaStore`].

mod record;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use record::AttributeRecord;

use crate::schema::SchemaStore;
use crate::{AttrError, AttrResult};

/// A recipe shipped by the package.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe name, e.g. `rvm::system`.
    pub name: String,
    /// What the recipe does.
    #[serde(default)]
    pub description: String,
}

/// Descriptive package metadata, passed through verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageMetadata {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// License name.
    pub license: String,
    /// One-line description.
    pub description: String,
    /// Long-form description, usually the README.
    #[serde(alias = "long_description")]
    pub long_description: String,
    /// Maintainer name.
    pub maintainer: String,
    /// Maintainer contact address.
    #[serde(alias = "maintainer_email")]
    pub maintainer_email: String,
    /// Platforms the package supports.
    #[serde(alias = "supported_platforms", alias = "supports")]
    pub supported_platforms: BTreeSet<String>,
    /// Recipes in declaration order.
    pub recipes: Vec<Recipe>,
    /// Packages that work well alongside this one.
    #[serde(alias = "recommended_packages", alias = "recommends")]
    pub recommended_packages: BTreeSet<String>,
}

/// A parsed manifest.
///
/// # Examples
///
/// ```
/// use cookbook_attrs::{AttrPath, Manifest};
///
/// let manifest: Manifest = serde_json::from_value(serde_json::json!({
///     "name": "rvm",
///     "version": "0.7.0",
///     "attributes": [
///         { "path": "rvm/default_ruby", "default": "ruby-1.9.2-p180" },
///         { "path": "rvm/rubies", "kind": "array", "default": ["ref(rvm/default_ruby)"] }
///     ]
/// }))?;
/// let schema = manifest.build_schema()?;
/// assert!(schema.is_sealed());
/// assert!(schema.contains(&AttrPath::parse("rvm/rubies")?));
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Metadata fields, flattened into the top level of the document.
    #[serde(flatten)]
    pub package: PackageMetadata,
    /// Attribute records in document order.
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

impl Manifest {
    /// Build a sealed schema from the attribute records.
    ///
    /// Every record is converted and registered before any failure is
    /// reported, then references are checked across the whole schema.
    ///
    /// # Errors
    ///
    /// Returns the first failure directly or an [`AttrError::Aggregate`] of
    /// all of them: invalid paths or kinds, literal defaults and choices that
    /// do not coerce, duplicate paths, dangling references and reference
    /// cycles.
    pub fn build_schema(&self) -> AttrResult<SchemaStore> {
        let mut schema = SchemaStore::new();
        let mut errors = Vec::new();
        for record in &self.attributes {
            if let Err(err) = record
                .to_declaration()
                .and_then(|declaration| schema.register(declaration))
            {
                errors.push(err);
            }
        }
        if let Some(err) = AttrError::collect_shared(errors) {
            return Err(err);
        }
        schema.check_references()?;
        schema.seal();
        tracing::debug!(
            package = %self.package.name,
            attributes = schema.len(),
            "built schema from manifest"
        );
        Ok(schema)
    }
}

#[cfg(test)]
mod tests;
