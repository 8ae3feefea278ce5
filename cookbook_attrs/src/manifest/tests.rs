//! Unit tests for manifest records and schema construction.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde_json::json;
use test_helpers::fixtures;

use super::{AttributeRecord, Manifest};
use crate::schema::{DefaultExpr, Requirement};
use crate::value::{AttrValue, AttributeKind, ScalarType};
use crate::{AttrError, AttrPath};

fn manifest(raw: serde_json::Value) -> Manifest {
    serde_json::from_value(raw).expect("manifest deserialises")
}

fn record(raw: serde_json::Value) -> AttributeRecord {
    serde_json::from_value(raw).expect("record deserialises")
}

fn path(raw: &str) -> AttrPath {
    AttrPath::parse(raw).expect("test path parses")
}

#[rstest]
fn minimal_manifest_builds_a_sealed_schema() -> Result<()> {
    let schema = manifest(fixtures::minimal_manifest())
        .build_schema()
        .map_err(|err| anyhow!(err.to_string()))?;
    ensure!(schema.is_sealed());
    ensure!(schema.len() == 2);
    let rubies = schema
        .get(&path("rvm/rubies"))
        .map_err(|err| anyhow!(err.to_string()))?;
    ensure!(rubies.kind() == AttributeKind::Sequence);
    ensure!(rubies.display_name() == "Installed RVM rubies");
    ensure!(rubies.default().map(DefaultExpr::references) == Some(vec![&path("rvm/default_ruby")]));
    Ok(())
}

#[rstest]
fn metadata_accepts_snake_case_aliases() {
    let parsed = manifest(json!({
        "name": "rvm",
        "maintainer_email": "fnichol@nichol.ca",
        "supports": ["ubuntu", "debian"],
        "recommends": ["java"],
        "recipes": [{ "name": "rvm::system", "description": "Installs system-wide RVM" }]
    }));
    assert_eq!(parsed.package.maintainer_email, "fnichol@nichol.ca");
    assert_eq!(
        parsed.package.supported_platforms.iter().collect::<Vec<_>>(),
        ["debian", "ubuntu"]
    );
    assert!(parsed.package.recommended_packages.contains("java"));
    assert_eq!(parsed.package.recipes.len(), 1);
    assert!(parsed.attributes.is_empty());
}

#[rstest]
#[case("scalar", AttributeKind::SCALAR)]
#[case("symbol", AttributeKind::Scalar(ScalarType::String))]
#[case("boolean", AttributeKind::Scalar(ScalarType::Boolean))]
#[case("numeric", AttributeKind::Scalar(ScalarType::Numeric))]
#[case("array", AttributeKind::Sequence)]
#[case("hash", AttributeKind::Mapping)]
fn record_type_alias_selects_kind(#[case] kind: &str, #[case] expected: AttributeKind) {
    let declaration = record(json!({ "path": "rvm/sample", "type": kind }))
        .to_declaration()
        .expect("record converts");
    assert_eq!(declaration.kind(), expected);
}

#[rstest]
fn records_default_to_untyped_scalars() {
    let declaration = record(json!({ "path": "rvm.branch" }))
        .to_declaration()
        .expect("record converts");
    assert_eq!(declaration.kind(), AttributeKind::SCALAR);
    assert_eq!(declaration.path(), &path("rvm/branch"));
    assert!(declaration.default().is_none());
    assert_eq!(declaration.requirement(), Requirement::Optional);
}

#[rstest]
fn informational_fields_pass_through() {
    let declaration = record(json!({
        "path": "rvm/vagrant/system_chef_solo",
        "description": "Path to chef-solo",
        "required": "recommended",
        "recipes": ["rvm::vagrant"],
        "calculated": true,
        "choice": ["/usr/bin/chef-solo", "/opt/chef/bin/chef-solo"]
    }))
    .to_declaration()
    .expect("record converts");
    assert_eq!(declaration.description(), "Path to chef-solo");
    assert_eq!(declaration.requirement(), Requirement::Recommended);
    assert_eq!(declaration.recipes(), ["rvm::vagrant"]);
    assert!(declaration.is_calculated());
    assert_eq!(declaration.choices().first(), Some(&AttrValue::from("/usr/bin/chef-solo")));
}

#[rstest]
#[case(json!({ "path": "rvm/x", "kind": "list" }), "invalid-kind")]
#[case(json!({ "path": "rvm//x" }), "invalid-path")]
#[case(json!({ "path": "rvm/x", "kind": "boolean", "default": "yes" }), "type-mismatch")]
#[case(json!({ "path": "rvm/x", "kind": "array", "default": "ruby" }), "type-mismatch")]
#[case(json!({ "path": "rvm/x", "kind": "numeric", "choice": ["one"] }), "type-mismatch")]
fn invalid_records_are_rejected(#[case] raw: serde_json::Value, #[case] kind_name: &str) {
    let err = record(raw).to_declaration().expect_err("record must fail");
    assert_eq!(err.kind_name(), kind_name);
}

#[rstest]
fn schema_errors_are_collected_across_records() {
    let err = manifest(json!({
        "attributes": [
            { "path": "rvm/a", "kind": "list" },
            { "path": "rvm/b" },
            { "path": "rvm.b" },
        ]
    }))
    .build_schema()
    .expect_err("two failures");
    match err.as_ref() {
        AttrError::Aggregate(errors) => {
            let kinds: Vec<&str> = errors.iter().map(AttrError::kind_name).collect();
            assert_eq!(kinds, ["invalid-kind", "duplicate-path"]);
        }
        other => panic!("expected Aggregate, got {other:?}"),
    }
}

#[rstest]
fn dangling_references_fail_the_build() {
    let err = manifest(json!({
        "attributes": [{ "path": "rvm/rubies", "kind": "array", "default": ["ref(rvm/missing)"] }]
    }))
    .build_schema()
    .expect_err("dangling reference");
    assert!(matches!(err.as_ref(), AttrError::UnknownAttribute { path: p } if p == &path("rvm/missing")));
}

#[rstest]
#[case(1, "loop/a0 -> loop/a0")]
#[case(2, "loop/a0 -> loop/a1 -> loop/a0")]
#[case(3, "loop/a0 -> loop/a1 -> loop/a2 -> loop/a0")]
fn reference_cycles_fail_the_build(#[case] len: usize, #[case] expected: &str) {
    let err = manifest(fixtures::cyclic_manifest(len))
        .build_schema()
        .expect_err("cycle detected");
    assert!(
        matches!(err.as_ref(), AttrError::CyclicDefault { cycle } if cycle == expected),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn null_defaults_mean_no_default() {
    let declaration = record(json!({ "path": "rvm/version", "default": null }))
        .to_declaration()
        .expect("record converts");
    assert!(declaration.default().is_none());
}
