//! Override layers and the precedence-ordered layer stack.
//!
//! A layer is a named, ranked tree of raw values. Layers are pushed onto a
//! [`LayerStack`] during initialization; once [`LayerStack::seal_all`] has
//! run the stack is read-only and resolution walks it highest rank first.

mod env;
mod tree;

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::iter::Rev;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use serde::Serialize;
use serde_json::Value;

pub use env::{AttrEnv, ENV_SEGMENT_SEPARATOR};
pub use tree::merge_value;

use crate::path::AttrPath;
use crate::{AttrError, AttrResult, AttrResultExt};

/// Conventional precedence ranks, lowest first.
pub mod tier {
    /// Cookbook-level defaults shipped alongside recipes.
    pub const DEFAULT: i32 = 100;
    /// Values applied by a role.
    pub const ROLE: i32 = 200;
    /// Values applied by a deployment environment.
    pub const ENVIRONMENT: i32 = 300;
    /// Explicit overrides.
    pub const OVERRIDE: i32 = 400;
}

/// Where a layer's data came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum LayerProvenance {
    /// Values built in code.
    Inline,
    /// Values loaded from a layer file.
    File,
    /// Values collected from environment variables.
    Environment,
    /// Values supplied on the command line.
    Cli,
}

/// A named, ranked set of raw attribute values.
///
/// # Examples
///
/// ```
/// use cookbook_attrs::{AttrPath, OverrideLayer};
/// use serde_json::json;
///
/// let path = AttrPath::parse("rvm/default_ruby")?;
/// let layer = OverrideLayer::new("production", 10).with_entry(&path, json!("ruby-2.0.0"));
/// assert_eq!(layer.get(&path), Some(&json!("ruby-2.0.0")));
/// # Ok::<_, std::sync::Arc<cookbook_attrs::AttrError>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct OverrideLayer {
    name: String,
    precedence: i32,
    provenance: LayerProvenance,
    entries: Value,
    source: Option<Utf8PathBuf>,
}

impl OverrideLayer {
    /// Create an empty inline layer.
    #[must_use]
    pub fn new(name: impl Into<String>, precedence: i32) -> Self {
        Self {
            name: name.into(),
            precedence,
            provenance: LayerProvenance::Inline,
            entries: Value::Object(serde_json::Map::new()),
            source: None,
        }
    }

    /// Create a layer from a nested object such as `{"rvm": {"branch": "x"}}`.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::InvalidLayer`] when `entries` is not an object.
    pub fn from_value(name: impl Into<String>, precedence: i32, entries: Value) -> AttrResult<Self> {
        let layer_name = name.into();
        if !entries.is_object() {
            return Err(Arc::new(AttrError::InvalidLayer {
                message: format!(
                    "expected a hash of attribute values, got {}",
                    crate::value::raw_kind(&entries)
                ),
                layer: layer_name,
            }));
        }
        Ok(Self {
            entries,
            ..Self::new(layer_name, precedence)
        })
    }

    /// Create a layer from variables named `{prefix}SEGMENT__SEGMENT`.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::Gathering`] when the environment cannot be read
    /// into a tree.
    pub fn from_environment(
        name: impl Into<String>,
        precedence: i32,
        prefix: &str,
    ) -> AttrResult<Self> {
        let entries: Value = Figment::from(AttrEnv::prefixed(prefix))
            .extract()
            .into_attr()?;
        Ok(Self::from_value(name, precedence, entries)?.with_provenance(LayerProvenance::Environment))
    }

    /// Set a single entry, replacing anything already at `path`.
    #[must_use]
    pub fn with_entry(mut self, path: &AttrPath, raw: Value) -> Self {
        self.insert(path, raw);
        self
    }

    /// Overlay a nested object onto the existing entries.
    #[must_use]
    pub fn with_entries(mut self, entries: Value) -> Self {
        merge_value(&mut self.entries, entries);
        self
    }

    /// Record where the data came from.
    #[must_use]
    pub const fn with_provenance(mut self, provenance: LayerProvenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Record the file the layer was read from.
    #[must_use]
    pub fn with_source(mut self, source: Utf8PathBuf) -> Self {
        self.source = Some(source);
        self.provenance = LayerProvenance::File;
        self
    }

    /// Set a single entry, replacing anything already at `path`.
    pub fn insert(&mut self, path: &AttrPath, raw: Value) {
        tree::insert_at(&mut self.entries, path, raw);
    }

    /// Raw value at `path`; explicit `null` entries count as absent.
    #[must_use]
    pub fn get(&self, path: &AttrPath) -> Option<&Value> {
        tree::lookup(&self.entries, path)
    }

    /// Whether the layer supplies a value for `path`.
    #[must_use]
    pub fn contains(&self, path: &AttrPath) -> bool {
        self.get(path).is_some()
    }

    /// Layer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Precedence rank; higher wins.
    #[must_use]
    pub const fn precedence(&self) -> i32 {
        self.precedence
    }

    /// Where the data came from.
    #[must_use]
    pub const fn provenance(&self) -> LayerProvenance {
        self.provenance
    }

    /// File the layer was read from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Utf8Path> {
        self.source.as_deref()
    }

    /// The full entry tree.
    #[must_use]
    pub const fn entries(&self) -> &Value {
        &self.entries
    }

    /// Slash-delimited paths of every leaf value in the layer.
    #[must_use]
    pub fn assigned_paths(&self) -> Vec<String> {
        tree::leaf_paths(&self.entries)
    }
}

/// Lazy, finite iterator over layers from highest to lowest precedence.
///
/// Call [`LayerStack::layers_descending`] again for a fresh pass.
pub type LayersDescending<'a> = Rev<btree_map::Values<'a, i32, OverrideLayer>>;

/// Layers ordered by precedence.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: BTreeMap<i32, OverrideLayer>,
    sealed: bool,
}

impl LayerStack {
    /// Create an empty, unsealed stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            layers: BTreeMap::new(),
            sealed: false,
        }
    }

    /// Add a layer.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::LayerStackSealed`] after [`Self::seal_all`] and
    /// [`AttrError::DuplicatePrecedence`] when another layer holds the same
    /// rank.
    pub fn push(&mut self, layer: OverrideLayer) -> AttrResult<()> {
        if self.sealed {
            return Err(Arc::new(AttrError::LayerStackSealed {
                layer: layer.name,
            }));
        }
        if let Some(existing) = self.layers.get(&layer.precedence) {
            return Err(Arc::new(AttrError::DuplicatePrecedence {
                precedence: layer.precedence,
                existing: existing.name.clone(),
                incoming: layer.name,
            }));
        }
        tracing::debug!(
            layer = %layer.name,
            precedence = layer.precedence,
            provenance = ?layer.provenance,
            "pushed override layer"
        );
        self.layers.insert(layer.precedence, layer);
        Ok(())
    }

    /// Freeze the stack for resolution; later pushes fail.
    pub fn seal_all(&mut self) {
        if !self.sealed {
            tracing::debug!(layers = self.layers.len(), "sealed layer stack");
        }
        self.sealed = true;
    }

    /// Whether [`Self::seal_all`] has been called.
    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Lazily iterate layers from highest to lowest precedence.
    pub fn layers_descending(&self) -> LayersDescending<'_> {
        self.layers.values().rev()
    }

    /// Layer holding `precedence`, if any.
    #[must_use]
    pub fn get(&self, precedence: i32) -> Option<&OverrideLayer> {
        self.layers.get(&precedence)
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
