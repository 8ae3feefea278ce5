//! Manifest and layer fixtures modelled on the RVM cookbook.

use serde_json::{Value, json};

/// The full RVM cookbook manifest in TOML.
pub const RVM_MANIFEST_TOML: &str = include_str!("../fixtures/rvm.toml");

/// A JSON layer file pinning a newer default ruby.
pub const PRODUCTION_LAYER_JSON: &str = include_str!("../fixtures/production.json");

/// The same layer as [`PRODUCTION_LAYER_JSON`], written in YAML.
pub const PRODUCTION_LAYER_YAML: &str = "\
rvm:
  default_ruby: ruby-2.0.0
  upgrade: latest
  rvmrc:
    rvm_project_rvmrc: 0
";

/// The smallest manifest exercising a default reference: `rvm/rubies`
/// defaults to a list holding `rvm/default_ruby`.
#[must_use]
pub fn minimal_manifest() -> Value {
    json!({
        "name": "rvm",
        "version": "0.7.0",
        "attributes": [
            {
                "path": "rvm/default_ruby",
                "displayName": "Default ruby",
                "kind": "scalar",
                "default": "ruby-1.9.2-p180"
            },
            {
                "path": "rvm/rubies",
                "displayName": "Installed RVM rubies",
                "kind": "array",
                "default": ["ref(rvm/default_ruby)"]
            }
        ]
    })
}

/// A manifest whose default references form a loop of `len` attributes,
/// `loop/a0 -> loop/a1 -> ... -> loop/a0`.
#[must_use]
pub fn cyclic_manifest(len: usize) -> Value {
    let attributes: Vec<Value> = (0..len)
        .map(|index| {
            let next = if index + 1 >= len { 0 } else { index + 1 };
            json!({
                "path": format!("loop/a{index}"),
                "default": format!("ref(loop/a{next})"),
            })
        })
        .collect();
    json!({ "name": "loop", "attributes": attributes })
}
