//! Assembly of a sealed schema, layer stack and package metadata into a
//! registry that can be shared across threads.

use std::sync::Arc;

use crate::layers::{LayerStack, OverrideLayer};
use crate::manifest::{Manifest, PackageMetadata};
use crate::path::AttrPath;
use crate::resolver::{ResolvedAttribute, Resolver};
use crate::schema::SchemaStore;
use crate::{AttrError, AttrResult};

/// Collects a schema and override layers, deferring every failure to
/// [`RegistryBuilder::build`].
///
/// # Examples
///
/// ```
/// use cookbook_attrs::{AttrPath, AttrValue, Manifest, OverrideLayer, RegistryBuilder};
/// use serde_json::json;
///
/// let manifest: Manifest = serde_json::from_value(json!({
///     "name": "rvm",
///     "attributes": [
///         { "path": "rvm/default_ruby", "default": "ruby-1.9.2-p180" },
///         { "path": "rvm/rubies", "kind": "array", "default": ["ref(rvm/default_ruby)"] }
///     ]
/// }))?;
/// let default_ruby = AttrPath::parse("rvm/default_ruby")?;
/// let registry = RegistryBuilder::from_manifest(&manifest)
///     .layer(OverrideLayer::new("production", 10).with_entry(&default_ruby, json!("ruby-2.0.0")))
///     .build()?;
///
/// let rubies = registry.resolve(&AttrPath::parse("rvm/rubies")?)?;
/// assert_eq!(rubies.value(), Some(&AttrValue::from(vec!["ruby-2.0.0"])));
/// assert_eq!(registry.package().name, "rvm");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
#[must_use = "call `build` to obtain a registry"]
pub struct RegistryBuilder {
    schema: SchemaStore,
    package: PackageMetadata,
    layers: LayerStack,
    errors: Vec<Arc<AttrError>>,
}

impl RegistryBuilder {
    /// Start from a manifest, building its schema and keeping its metadata.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let package = manifest.package.clone();
        match manifest.build_schema() {
            Ok(schema) => Self::with_parts(schema, package, Vec::new()),
            Err(err) => Self::with_parts(SchemaStore::new(), package, vec![err]),
        }
    }

    /// Start from a programmatically registered schema.
    ///
    /// References are checked and the store is sealed.
    pub fn from_schema(mut schema: SchemaStore) -> Self {
        let errors = schema.check_references().err().into_iter().collect();
        schema.seal();
        Self::with_parts(schema, PackageMetadata::default(), errors)
    }

    fn with_parts(
        schema: SchemaStore,
        package: PackageMetadata,
        errors: Vec<Arc<AttrError>>,
    ) -> Self {
        Self {
            schema,
            package,
            layers: LayerStack::new(),
            errors,
        }
    }

    /// Replace the package metadata.
    pub fn package(mut self, package: PackageMetadata) -> Self {
        self.package = package;
        self
    }

    /// Add an override layer. Precedence clashes are reported by `build`.
    pub fn layer(mut self, layer: OverrideLayer) -> Self {
        if let Err(err) = self.layers.push(layer) {
            self.errors.push(err);
        }
        self
    }

    /// Add the outcome of loading a layer, keeping the error if it failed.
    pub fn try_layer(self, layer: AttrResult<OverrideLayer>) -> Self {
        match layer {
            Ok(loaded) => self.layer(loaded),
            Err(err) => self.record(err),
        }
    }

    fn record(mut self, err: Arc<AttrError>) -> Self {
        self.errors.push(err);
        self
    }

    /// Seal the layer stack and produce the registry.
    ///
    /// # Errors
    ///
    /// Returns the single collected failure, or an [`AttrError::Aggregate`]
    /// when several schema or layer problems were recorded.
    pub fn build(self) -> AttrResult<AttributeRegistry> {
        let Self {
            schema,
            package,
            mut layers,
            errors,
        } = self;
        if let Some(err) = AttrError::collect_shared(errors) {
            return Err(err);
        }
        layers.seal_all();
        tracing::debug!(
            attributes = schema.len(),
            layers = layers.len(),
            "attribute registry built"
        );
        Ok(AttributeRegistry {
            schema,
            layers,
            package,
        })
    }
}

/// A sealed schema and layer stack ready for concurrent lookups.
#[derive(Debug)]
pub struct AttributeRegistry {
    schema: SchemaStore,
    layers: LayerStack,
    package: PackageMetadata,
}

impl AttributeRegistry {
    /// A resolver borrowing this registry.
    #[must_use]
    pub const fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.schema, &self.layers)
    }

    /// Resolve one attribute. See [`Resolver::resolve`].
    ///
    /// # Errors
    ///
    /// Propagates resolution failures for `path`.
    pub fn resolve(&self, path: &AttrPath) -> AttrResult<ResolvedAttribute> {
        self.resolver().resolve(path)
    }

    /// Resolve every declared attribute in path order.
    ///
    /// # Errors
    ///
    /// Returns every failure, aggregated when there are several.
    pub fn resolve_all(&self) -> AttrResult<Vec<ResolvedAttribute>> {
        self.resolver().resolve_all()
    }

    /// Package metadata carried by the manifest.
    #[must_use]
    pub const fn package(&self) -> &PackageMetadata {
        &self.package
    }

    /// The sealed schema.
    #[must_use]
    pub const fn schema(&self) -> &SchemaStore {
        &self.schema
    }

    /// The sealed layer stack.
    #[must_use]
    pub const fn layers(&self) -> &LayerStack {
        &self.layers
    }
}
