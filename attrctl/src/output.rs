//! Rendering of resolved attributes and metadata.

use std::io::Write;

use cookbook_attrs::{AttributeRegistry, LayerProvenance, PackageMetadata, ResolvedAttribute};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::AttrctlError;

/// Write resolved attributes, one per line in text mode.
pub fn write_resolved<W: Write>(
    out: &mut W,
    resolved: &[ResolvedAttribute],
    format: OutputFormat,
) -> Result<(), AttrctlError> {
    match format {
        OutputFormat::Json => write_json(out, resolved),
        OutputFormat::Text => {
            for attribute in resolved {
                match attribute.value() {
                    Some(value) => writeln!(
                        out,
                        "{} = {value} [{}]",
                        attribute.path(),
                        attribute.source()
                    )?,
                    None => writeln!(out, "{} is unset", attribute.path())?,
                }
            }
            Ok(())
        }
    }
}

/// Write package metadata.
pub fn write_metadata<W: Write>(
    out: &mut W,
    package: &PackageMetadata,
    format: OutputFormat,
) -> Result<(), AttrctlError> {
    match format {
        OutputFormat::Json => write_json(out, package),
        OutputFormat::Text => {
            writeln!(out, "name: {}", package.name)?;
            writeln!(out, "version: {}", package.version)?;
            writeln!(out, "license: {}", package.license)?;
            writeln!(
                out,
                "maintainer: {} <{}>",
                package.maintainer, package.maintainer_email
            )?;
            writeln!(out, "description: {}", package.description)?;
            writeln!(out, "platforms: {}", join(&package.supported_platforms))?;
            writeln!(out, "recommends: {}", join(&package.recommended_packages))?;
            writeln!(out, "recipes:")?;
            for recipe in &package.recipes {
                writeln!(out, "  {}: {}", recipe.name, recipe.description)?;
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct LayerSummary<'a> {
    name: &'a str,
    precedence: i32,
    provenance: LayerProvenance,
}

#[derive(Serialize)]
struct CheckSummary<'a> {
    attributes: usize,
    layers: Vec<LayerSummary<'a>>,
}

/// Summarise a registry that loaded and resolved cleanly.
pub fn write_check<W: Write>(
    out: &mut W,
    registry: &AttributeRegistry,
    format: OutputFormat,
) -> Result<(), AttrctlError> {
    let summary = CheckSummary {
        attributes: registry.schema().len(),
        layers: registry
            .layers()
            .layers_descending()
            .map(|layer| LayerSummary {
                name: layer.name(),
                precedence: layer.precedence(),
                provenance: layer.provenance(),
            })
            .collect(),
    };
    match format {
        OutputFormat::Json => write_json(out, &summary),
        OutputFormat::Text => {
            writeln!(
                out,
                "ok: {} attributes, {} layers",
                summary.attributes,
                summary.layers.len()
            )?;
            for layer in &summary.layers {
                writeln!(out, "  {} ({})", layer.name, layer.precedence)?;
            }
            Ok(())
        }
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), AttrctlError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
