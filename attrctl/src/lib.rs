//! Library interface for the `attrctl` command-line tool.
//!
//! [`run`] loads a manifest, stacks layer files, an optional environment
//! layer and `--set` values, then writes the requested view to any writer.

pub mod cli;
pub mod error;
pub mod logging;
mod output;

use std::io::Write;

use cookbook_attrs::{
    AttrError, AttributeRegistry, LayerProvenance, Manifest, OverrideLayer, RegistryBuilder,
    load_layer_file, load_manifest,
};

use crate::cli::{Args, Command};
use crate::error::AttrctlError;

/// Execute the parsed command, writing its output to `out`.
///
/// # Errors
///
/// Returns an [`AttrctlError`] when loading, resolving or writing fails.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), AttrctlError> {
    let manifest = load_manifest(&args.manifest)?;
    let registry = build_registry(args, &manifest)?;
    match &args.command {
        Command::Resolve { paths } => {
            let mut resolved = Vec::with_capacity(paths.len());
            let mut errors = Vec::new();
            for path in paths {
                match registry.resolve(path) {
                    Ok(attribute) => resolved.push(attribute),
                    Err(err) => errors.push(err),
                }
            }
            if let Some(err) = AttrError::collect_shared(errors) {
                return Err(err.into());
            }
            output::write_resolved(out, &resolved, args.format)
        }
        Command::List => output::write_resolved(out, &registry.resolve_all()?, args.format),
        Command::Metadata => output::write_metadata(out, registry.package(), args.format),
        Command::Check => {
            registry.resolve_all()?;
            output::write_check(out, &registry, args.format)
        }
    }
}

/// Stack every layer named on the command line over `manifest`.
///
/// # Errors
///
/// Returns every schema and layer failure, aggregated when there are
/// several.
pub fn build_registry(args: &Args, manifest: &Manifest) -> Result<AttributeRegistry, AttrctlError> {
    let mut builder = RegistryBuilder::from_manifest(manifest);
    for layer in &args.layers {
        builder = builder.try_layer(load_layer_file(
            layer.name.as_str(),
            layer.precedence,
            &layer.path,
        ));
    }
    if let Some(prefix) = &args.env_prefix {
        builder = builder.try_layer(OverrideLayer::from_environment(
            "environment",
            args.env_precedence,
            prefix,
        ));
    }
    if !args.overrides.is_empty() {
        let cli_layer = args.overrides.iter().fold(
            OverrideLayer::new("cli", args.set_precedence).with_provenance(LayerProvenance::Cli),
            |layer, set| layer.with_entry(&set.path, set.value.clone()),
        );
        builder = builder.layer(cli_layer);
    }
    Ok(builder.build()?)
}
