//! Step definitions for resolution and coercion scenarios.

use anyhow::{Context, Result, anyhow, ensure};
use camino::Utf8Path;
use cookbook_attrs::{AttrPath, AttrValue, Manifest, OverrideLayer, RegistryBuilder};
use rstest_bdd_macros::{given, then, when};
use serde_json::Value;
use test_helpers::fixtures;

use crate::fixtures::ResolutionContext;

fn attr_path(raw: &str) -> Result<AttrPath> {
    AttrPath::parse(raw).map_err(|err| anyhow!(err.to_string()))
}

/// Start a builder from the scenario's manifest and every layer given so far.
fn builder(resolution_context: &ResolutionContext) -> Result<RegistryBuilder> {
    let manifest = resolution_context
        .manifest
        .with_ref(Clone::clone)
        .ok_or_else(|| anyhow!("no manifest was given"))?;
    let layers = resolution_context.layers.take().unwrap_or_default();
    Ok(layers
        .into_iter()
        .fold(RegistryBuilder::from_manifest(&manifest), RegistryBuilder::layer))
}

#[given("the minimal rvm manifest")]
fn minimal_manifest(resolution_context: &ResolutionContext) -> Result<()> {
    let manifest: Manifest = serde_json::from_value(fixtures::minimal_manifest())?;
    resolution_context.manifest.set(manifest);
    Ok(())
}

#[given("the rvm cookbook manifest")]
fn rvm_manifest(resolution_context: &ResolutionContext) -> Result<()> {
    let manifest = cookbook_attrs::parse_manifest(
        Utf8Path::new("metadata.toml"),
        fixtures::RVM_MANIFEST_TOML,
    )
    .map_err(|err| anyhow!(err.to_string()))?;
    resolution_context.manifest.set(manifest);
    Ok(())
}

#[given("a manifest whose defaults loop over {len:usize} attributes")]
fn cyclic_manifest(resolution_context: &ResolutionContext, len: usize) -> Result<()> {
    let manifest: Manifest = serde_json::from_value(fixtures::cyclic_manifest(len))?;
    resolution_context.manifest.set(manifest);
    Ok(())
}

#[given("a layer \"{name}\" at precedence {precedence:i32} setting \"{target}\" to \"{value}\"")]
fn layer_entry(
    resolution_context: &ResolutionContext,
    name: String,
    precedence: i32,
    target: String,
    value: String,
) -> Result<()> {
    let layer = OverrideLayer::new(name, precedence).with_entry(&attr_path(&target)?, Value::String(value));
    let mut layers = resolution_context.layers.take().unwrap_or_default();
    layers.push(layer);
    resolution_context.layers.set(layers);
    Ok(())
}

#[when("I resolve \"{target}\"")]
fn resolve(resolution_context: &ResolutionContext, target: String) -> Result<()> {
    let registry = builder(resolution_context)?
        .build()
        .map_err(|err| anyhow!(err.to_string()))?;
    let outcome = registry.resolve(&attr_path(&target)?);
    resolution_context.resolution.set(outcome);
    Ok(())
}

#[when("the registry is built")]
fn build_registry(resolution_context: &ResolutionContext) -> Result<()> {
    let outcome = builder(resolution_context)?.build();
    if let Err(err) = outcome {
        resolution_context.build_error.set(err);
    }
    Ok(())
}

#[then("the resolved value is {expected}")]
fn resolved_value(resolution_context: &ResolutionContext, expected: String) -> Result<()> {
    let expected_json: Value =
        serde_json::from_str(&expected).context("expected value must be JSON")?;
    let actual = resolution_context
        .resolution
        .with_ref(|outcome| {
            outcome
                .as_ref()
                .map(|resolved| resolved.value().map(AttrValue::to_json))
                .map_err(ToString::to_string)
        })
        .ok_or_else(|| anyhow!("nothing was resolved"))?
        .map_err(|err| anyhow!(err))?;
    ensure!(
        actual.as_ref() == Some(&expected_json),
        "expected {expected_json}, got {actual:?}"
    );
    Ok(())
}

#[then("the value came from \"{source}\"")]
fn value_source(resolution_context: &ResolutionContext, source: String) -> Result<()> {
    let label = resolution_context
        .resolution
        .with_ref(|outcome| {
            outcome
                .as_ref()
                .map(|resolved| resolved.source().label().to_owned())
                .map_err(ToString::to_string)
        })
        .ok_or_else(|| anyhow!("nothing was resolved"))?
        .map_err(|err| anyhow!(err))?;
    ensure!(label == source, "expected source {source}, got {label}");
    Ok(())
}

#[then("resolution fails with a \"{kind}\" error")]
fn resolution_fails(resolution_context: &ResolutionContext, kind: String) -> Result<()> {
    let actual = resolution_context
        .resolution
        .with_ref(|outcome| outcome.as_ref().err().map(|err| err.kind_name()))
        .ok_or_else(|| anyhow!("nothing was resolved"))?;
    ensure!(actual == Some(kind.as_str()), "expected {kind} error, got {actual:?}");
    Ok(())
}

#[then("the build fails with a \"{kind}\" error")]
fn build_fails(resolution_context: &ResolutionContext, kind: String) -> Result<()> {
    let actual = resolution_context
        .build_error
        .with_ref(|err| err.kind_name())
        .ok_or_else(|| anyhow!("the registry built without errors"))?;
    ensure!(actual == kind, "expected {kind} error, got {actual}");
    Ok(())
}
