//! Typed cookbook attribute registry.
//!
//! A cookbook manifest declares attributes with paths, kinds and defaults.
//! Defaults may be literals or references to other attributes, so
//! `rvm/rubies` can default to `[rvm/default_ruby]` and follow whatever that
//! attribute resolves to. Override layers (files, environment variables,
//! inline values) are stacked by precedence; the [`Resolver`] walks them
//! highest first, falls back to the declared default and coerces the result to
//! the declared kind.
//!
//! ```
//! use cookbook_attrs::{AttrPath, AttrValue, Manifest, OverrideLayer, RegistryBuilder};
//! use serde_json::json;
//!
//! let manifest: Manifest = serde_json::from_value(json!({
//!     "name": "rvm",
//!     "attributes": [
//!         { "path": "rvm/default_ruby", "default": "ruby-1.9.2-p180" },
//!         { "path": "rvm/rubies", "type": "array", "default": ["node[:rvm][:default_ruby]"] }
//!     ]
//! }))?;
//! let rubies = AttrPath::parse("rvm/rubies")?;
//!
//! let defaults = RegistryBuilder::from_manifest(&manifest).build()?;
//! assert_eq!(
//!     defaults.resolve(&rubies)?.value(),
//!     Some(&AttrValue::from(vec!["ruby-1.9.2-p180"]))
//! );
//!
//! let pinned = RegistryBuilder::from_manifest(&manifest)
//!     .layer(OverrideLayer::new("production", 10).with_entry(
//!         &AttrPath::parse("rvm/default_ruby")?,
//!         json!("ruby-2.0.0"),
//!     ))
//!     .build()?;
//! assert_eq!(
//!     pinned.resolve(&rubies)?.value(),
//!     Some(&AttrValue::from(vec!["ruby-2.0.0"]))
//! );
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;

mod coerce;
mod error;
mod file;
pub mod layers;
mod manifest;
mod path;
mod registry;
mod resolver;
mod result_ext;
mod schema;
mod value;

pub use coerce::coerce;
pub use error::{AggregatedErrors, AttrError};
#[cfg(feature = "yaml")]
pub use file::SaphyrYaml;
pub use file::{load_layer_file, load_manifest, parse_layer, parse_manifest};
pub use layers::{LayerProvenance, LayerStack, OverrideLayer};
pub use manifest::{AttributeRecord, Manifest, PackageMetadata, Recipe};
pub use path::AttrPath;
pub use registry::{AttributeRegistry, RegistryBuilder};
pub use resolver::{ResolutionSource, ResolvedAttribute, Resolver};
pub use result_ext::{AttrResultExt, IntoFigmentError, ResultIntoFigment};
pub use schema::{AttributeDeclaration, DefaultExpr, Requirement, SchemaStore, parse_reference};
pub use value::{AttrValue, AttributeKind, ScalarType, UnknownKind};

/// Re-export of `serde_json` so callers can build raw values without a
/// separate dependency.
pub use serde_json;

/// Result alias for attribute operations; errors are shared so aggregates can
/// hold them without cloning.
pub type AttrResult<T> = Result<T, Arc<AttrError>>;
