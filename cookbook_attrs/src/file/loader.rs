//! Entry points for loading manifests and layer files.

use camino::Utf8Path;

use super::error::file_error;
use super::parser::parse_document;
use crate::AttrResult;
use crate::layers::OverrideLayer;
use crate::manifest::Manifest;

fn read(path: &Utf8Path) -> AttrResult<String> {
    std::fs::read_to_string(path).map_err(|e| file_error(path, e))
}

/// Load a manifest, selecting the parser from the file extension.
///
/// # Examples
///
/// ```rust,no_run
/// use camino::Utf8Path;
/// use cookbook_attrs::load_manifest;
///
/// # fn run() -> cookbook_attrs::AttrResult<()> {
/// let manifest = load_manifest(Utf8Path::new("metadata.toml"))?;
/// let schema = manifest.build_schema()?;
/// assert!(schema.is_sealed());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an [`crate::AttrError::File`] if the file cannot be read or parsed,
/// or does not match the manifest layout.
pub fn load_manifest(path: &Utf8Path) -> AttrResult<Manifest> {
    let data = read(path)?;
    parse_manifest(path, &data)
}

/// Parse manifest text; `path` selects the format and labels errors.
///
/// # Errors
///
/// Returns an [`crate::AttrError::File`] if the text cannot be parsed or does
/// not match the manifest layout.
pub fn parse_manifest(path: &Utf8Path, data: &str) -> AttrResult<Manifest> {
    let document = parse_document(path, data)?;
    let manifest: Manifest = serde_json::from_value(document).map_err(|e| file_error(path, e))?;
    tracing::debug!(
        path = %path,
        attributes = manifest.attributes.len(),
        "loaded manifest"
    );
    Ok(manifest)
}

/// Load an override layer from a file of nested attribute tables.
///
/// ```toml
/// [rvm]
/// default_ruby = "ruby-2.0.0"
/// ```
///
/// # Errors
///
/// Returns an [`crate::AttrError::File`] if the file cannot be read or parsed.
pub fn load_layer_file(
    name: impl Into<String>,
    precedence: i32,
    path: &Utf8Path,
) -> AttrResult<OverrideLayer> {
    let data = read(path)?;
    parse_layer(name, precedence, path, &data)
}

/// Parse layer text; `path` selects the format and is recorded as the
/// layer's source.
///
/// # Errors
///
/// Returns an [`crate::AttrError::File`] if the text cannot be parsed.
pub fn parse_layer(
    name: impl Into<String>,
    precedence: i32,
    path: &Utf8Path,
    data: &str,
) -> AttrResult<OverrideLayer> {
    let document = parse_document(path, data)?;
    let layer = OverrideLayer::from_value(name, precedence, document)?.with_source(path.to_owned());
    tracing::debug!(
        layer = layer.name(),
        precedence,
        path = %path,
        "loaded layer file"
    );
    Ok(layer)
}
