//! Unit tests for layered resolution and default references.

use rstest::{fixture, rstest};
use serde_json::json;

use super::{ResolutionSource, Resolver};
use crate::layers::{LayerStack, OverrideLayer};
use crate::schema::{AttributeDeclaration, DefaultExpr, SchemaStore};
use crate::value::{AttrValue, AttributeKind, ScalarType};
use crate::{AttrError, AttrPath};

fn path(raw: &str) -> AttrPath {
    AttrPath::parse(raw).expect("test path parses")
}

fn scalar(raw: &str) -> AttributeDeclaration {
    AttributeDeclaration::new(path(raw), AttributeKind::SCALAR)
}

fn reference(raw: &str, target: &str) -> AttributeDeclaration {
    scalar(raw).with_default_ref(path(target))
}

fn sealed(declarations: Vec<AttributeDeclaration>) -> SchemaStore {
    let mut schema = SchemaStore::new();
    for declaration in declarations {
        schema.register(declaration).expect("declaration registers");
    }
    schema.seal();
    schema
}

#[fixture]
fn rvm_schema() -> SchemaStore {
    sealed(vec![
        scalar("rvm/default_ruby").with_literal_default("ruby-1.9.2-p180"),
        AttributeDeclaration::new(path("rvm/rubies"), AttributeKind::Sequence)
            .with_default(DefaultExpr::from_raw(json!(["node[:rvm][:default_ruby]"]))),
        reference("rvm/gem_package/rvm_string", "rvm/default_ruby"),
        AttributeDeclaration::new(
            path("rvm/install_rubies"),
            AttributeKind::Scalar(ScalarType::Boolean),
        )
        .with_literal_default("true"),
        scalar("rvm/branch"),
        scalar("rvm/upgrade")
            .with_literal_default("none")
            .with_choices(vec![AttrValue::from("none"), AttrValue::from("latest")]),
    ])
}

fn stack(layers: Vec<OverrideLayer>) -> LayerStack {
    let mut stack = LayerStack::new();
    for layer in layers {
        stack.push(layer).expect("layer pushes");
    }
    stack.seal_all();
    stack
}

#[rstest]
fn literal_default_applies_without_layers(rvm_schema: SchemaStore) {
    let layers = stack(Vec::new());
    let resolved = Resolver::new(&rvm_schema, &layers)
        .resolve(&path("rvm/default_ruby"))
        .expect("resolves");
    assert_eq!(resolved.value(), Some(&AttrValue::from("ruby-1.9.2-p180")));
    assert_eq!(resolved.source(), &ResolutionSource::SchemaDefault);
}

#[rstest]
fn literal_defaults_are_coerced(rvm_schema: SchemaStore) {
    let layers = stack(Vec::new());
    let resolved = Resolver::new(&rvm_schema, &layers)
        .resolve(&path("rvm/install_rubies"))
        .expect("resolves");
    assert_eq!(resolved.value(), Some(&AttrValue::Bool(true)));
}

#[rstest]
fn highest_layer_wins(rvm_schema: SchemaStore) {
    let target = path("rvm/default_ruby");
    let layers = stack(vec![
        OverrideLayer::new("role", 5).with_entry(&target, json!("ruby-1.8.7")),
        OverrideLayer::new("override", 50).with_entry(&target, json!("ruby-2.1.0")),
        OverrideLayer::new("environment", 10).with_entry(&target, json!("ruby-2.0.0")),
    ]);
    let resolved = Resolver::new(&rvm_schema, &layers)
        .resolve(&target)
        .expect("resolves");
    assert_eq!(resolved.value(), Some(&AttrValue::from("ruby-2.1.0")));
    assert_eq!(
        resolved.source(),
        &ResolutionSource::Layer {
            name: String::from("override"),
            precedence: 50,
        }
    );
    assert_eq!(resolved.source().label(), "override");
}

#[rstest]
fn references_follow_layer_overrides(rvm_schema: SchemaStore) {
    let layers = stack(vec![
        OverrideLayer::new("environment", 10).with_entry(&path("rvm/default_ruby"), json!("ruby-2.0.0")),
    ]);
    let resolver = Resolver::new(&rvm_schema, &layers);

    let rubies = resolver.resolve(&path("rvm/rubies")).expect("rubies resolve");
    assert_eq!(rubies.value(), Some(&AttrValue::from(vec!["ruby-2.0.0"])));
    assert_eq!(rubies.source(), &ResolutionSource::ResolvedReference);

    let rvm_string = resolver
        .resolve(&path("rvm/gem_package/rvm_string"))
        .expect("rvm_string resolves");
    assert_eq!(rvm_string.value(), Some(&AttrValue::from("ruby-2.0.0")));
    assert_eq!(rvm_string.source().label(), "resolved-reference");
}

#[rstest]
fn layer_values_beat_reference_defaults(rvm_schema: SchemaStore) {
    let layers = stack(vec![
        OverrideLayer::new("role", 20).with_entry(&path("rvm/rubies"), json!(["jruby"])),
    ]);
    let resolved = Resolver::new(&rvm_schema, &layers)
        .resolve(&path("rvm/rubies"))
        .expect("resolves");
    assert_eq!(resolved.value(), Some(&AttrValue::from(vec!["jruby"])));
}

#[rstest]
fn coercion_failure_in_winning_layer_is_fatal(rvm_schema: SchemaStore) {
    let target = path("rvm/install_rubies");
    let layers = stack(vec![
        OverrideLayer::new("low", 1).with_entry(&target, json!("false")),
        OverrideLayer::new("high", 2).with_entry(&target, json!("yes")),
    ]);
    let err = Resolver::new(&rvm_schema, &layers)
        .resolve(&target)
        .expect_err("mismatch is fatal");
    assert!(matches!(
        err.as_ref(),
        AttrError::TypeMismatch { path: p, got: "string", .. } if p == &target
    ));
}

#[rstest]
fn unknown_paths_are_reported(rvm_schema: SchemaStore) {
    let layers = stack(Vec::new());
    let err = Resolver::new(&rvm_schema, &layers)
        .resolve(&path("rvm/missing"))
        .expect_err("unknown path");
    assert!(matches!(err.as_ref(), AttrError::UnknownAttribute { .. }));
}

#[rstest]
fn attributes_without_defaults_are_unset(rvm_schema: SchemaStore) {
    let layers = stack(Vec::new());
    let resolved = Resolver::new(&rvm_schema, &layers)
        .resolve(&path("rvm/branch"))
        .expect("resolves");
    assert_eq!(resolved.value(), None);
    assert_eq!(resolved.source(), &ResolutionSource::Unset);
}

#[rstest]
fn null_layer_entries_fall_through(rvm_schema: SchemaStore) {
    let layers = stack(vec![
        OverrideLayer::new("high", 30).with_entries(json!({"rvm": {"default_ruby": null}})),
    ]);
    let resolved = Resolver::new(&rvm_schema, &layers)
        .resolve(&path("rvm/default_ruby"))
        .expect("resolves");
    assert_eq!(resolved.source(), &ResolutionSource::SchemaDefault);
}

#[rstest]
fn values_outside_choices_are_rejected(rvm_schema: SchemaStore) {
    let target = path("rvm/upgrade");
    let accepted = stack(vec![OverrideLayer::new("a", 1).with_entry(&target, json!("latest"))]);
    assert!(Resolver::new(&rvm_schema, &accepted).resolve(&target).is_ok());

    let rejected = stack(vec![OverrideLayer::new("a", 1).with_entry(&target, json!("head"))]);
    let err = Resolver::new(&rvm_schema, &rejected)
        .resolve(&target)
        .expect_err("choice enforced");
    assert!(matches!(err.as_ref(), AttrError::InvalidChoice { value, .. } if value == "\"head\""));
}

#[rstest]
fn unset_references_are_omitted_from_composites() {
    let schema = sealed(vec![
        scalar("rvm/branch"),
        scalar("rvm/version").with_literal_default("1.6.32"),
        AttributeDeclaration::new(path("rvm/pins"), AttributeKind::Sequence)
            .with_default(DefaultExpr::from_raw(json!(["ref(rvm/branch)", "ref(rvm/version)"]))),
        AttributeDeclaration::new(path("rvm/pin_map"), AttributeKind::Mapping)
            .with_default(DefaultExpr::from_raw(json!({"branch": "ref(rvm/branch)", "head": true}))),
        reference("rvm/alias", "rvm/branch"),
    ]);
    let layers = stack(Vec::new());
    let resolver = Resolver::new(&schema, &layers);

    let pins = resolver.resolve(&path("rvm/pins")).expect("pins resolve");
    assert_eq!(pins.value(), Some(&AttrValue::from(vec!["1.6.32"])));

    let pin_map = resolver.resolve(&path("rvm/pin_map")).expect("pin map resolves");
    assert_eq!(pin_map.value().map(AttrValue::to_json), Some(json!({"head": true})));

    let alias = resolver.resolve(&path("rvm/alias")).expect("alias resolves");
    assert_eq!(alias.value(), None);
    assert_eq!(alias.source(), &ResolutionSource::ResolvedReference);
}

#[rstest]
#[case::self_reference(vec![("a", "a")], "a", "a -> a")]
#[case::pair(vec![("a", "b"), ("b", "a")], "a", "a -> b -> a")]
#[case::triangle(vec![("a", "b"), ("b", "c"), ("c", "a")], "b", "b -> c -> a -> b")]
fn cyclic_references_fail(
    #[case] edges: Vec<(&str, &str)>,
    #[case] start: &str,
    #[case] expected: &str,
) {
    let schema = sealed(
        edges
            .into_iter()
            .map(|(from, to)| reference(from, to))
            .collect(),
    );
    let layers = stack(Vec::new());
    let err = Resolver::new(&schema, &layers)
        .resolve(&path(start))
        .expect_err("cycle detected");
    assert!(
        matches!(err.as_ref(), AttrError::CyclicDefault { cycle } if cycle == expected),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn tails_leading_into_cycles_report_only_the_loop() {
    let schema = sealed(vec![reference("entry", "a"), reference("a", "b"), reference("b", "a")]);
    let layers = stack(Vec::new());
    let err = Resolver::new(&schema, &layers)
        .resolve(&path("entry"))
        .expect_err("cycle detected");
    assert!(matches!(err.as_ref(), AttrError::CyclicDefault { cycle } if cycle == "a -> b -> a"));
}

#[rstest]
fn layer_values_break_reference_cycles() {
    let schema = sealed(vec![reference("a", "b"), reference("b", "a")]);
    let layers = stack(vec![OverrideLayer::new("pin", 1).with_entry(&path("b"), json!("fixed"))]);
    let resolved = Resolver::new(&schema, &layers)
        .resolve(&path("a"))
        .expect("layer value short-circuits the loop");
    assert_eq!(resolved.value(), Some(&AttrValue::from("fixed")));
}

#[rstest]
fn dangling_references_report_the_target() {
    let schema = sealed(vec![reference("rvm/rubies", "rvm/missing")]);
    let layers = stack(Vec::new());
    let err = Resolver::new(&schema, &layers)
        .resolve(&path("rvm/rubies"))
        .expect_err("dangling reference");
    assert_eq!(err.path(), Some(&path("rvm/missing")));
}

#[rstest]
fn resolve_all_walks_every_declaration(rvm_schema: SchemaStore) {
    let layers = stack(Vec::new());
    let resolved = Resolver::new(&rvm_schema, &layers)
        .resolve_all()
        .expect("all resolve");
    let paths: Vec<String> = resolved.iter().map(|r| r.path().to_string()).collect();
    assert_eq!(
        paths,
        [
            "rvm/branch",
            "rvm/default_ruby",
            "rvm/gem_package/rvm_string",
            "rvm/install_rubies",
            "rvm/rubies",
            "rvm/upgrade",
        ]
    );
}

#[rstest]
fn resolve_all_aggregates_failures(rvm_schema: SchemaStore) {
    let layers = stack(vec![
        OverrideLayer::new("bad", 1)
            .with_entry(&path("rvm/install_rubies"), json!("maybe"))
            .with_entry(&path("rvm/rubies"), json!("ruby-2.0.0")),
    ]);
    let err = Resolver::new(&rvm_schema, &layers)
        .resolve_all()
        .expect_err("two failures");
    match err.as_ref() {
        AttrError::Aggregate(errors) => assert_eq!(errors.len(), 2),
        other => panic!("expected Aggregate, got {other:?}"),
    }
}

#[rstest]
fn resolved_attributes_serialise_flat() {
    let schema = sealed(vec![scalar("rvm/default_ruby").with_literal_default("ruby-1.9.2-p180")]);
    let layers = stack(Vec::new());
    let resolved = Resolver::new(&schema, &layers)
        .resolve(&path("rvm/default_ruby"))
        .expect("resolves");
    assert_eq!(
        serde_json::to_value(&resolved).expect("serialises"),
        json!({
            "path": "rvm/default_ruby",
            "value": "ruby-1.9.2-p180",
            "source": "schema-default",
        })
    );
}
