//! Shared fixtures for the behavioural scenarios.

use std::sync::Arc;

use cookbook_attrs::{AttrError, AttrResult, Manifest, OverrideLayer, ResolvedAttribute};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// State shared between the steps of one resolution scenario.
#[derive(Debug, Default, ScenarioState)]
pub struct ResolutionContext {
    pub manifest: Slot<Manifest>,
    pub layers: Slot<Vec<OverrideLayer>>,
    pub resolution: Slot<AttrResult<ResolvedAttribute>>,
    pub build_error: Slot<Arc<AttrError>>,
}

/// Creates a clean context for each scenario.
#[fixture]
pub fn resolution_context() -> ResolutionContext {
    ResolutionContext::default()
}
