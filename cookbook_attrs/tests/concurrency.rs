//! Shared, lock-free resolution from many threads.

use std::thread;

use camino::Utf8Path;
use cookbook_attrs::{AttrPath, AttrValue, OverrideLayer, RegistryBuilder, parse_manifest};
use serde_json::json;
use test_helpers::fixtures;

#[test]
fn sealed_registries_resolve_concurrently() {
    let manifest = parse_manifest(Utf8Path::new("metadata.toml"), fixtures::RVM_MANIFEST_TOML)
        .expect("rvm manifest parses");
    let default_ruby = AttrPath::parse("rvm/default_ruby").expect("path parses");
    let registry = RegistryBuilder::from_manifest(&manifest)
        .layer(OverrideLayer::new("production", 10).with_entry(&default_ruby, json!("ruby-2.0.0")))
        .build()
        .expect("registry builds");
    let rubies = AttrPath::parse("rvm/rubies").expect("path parses");
    let expected = AttrValue::from(vec!["ruby-2.0.0"]);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..100)
                        .map(|_| registry.resolve(&rubies).expect("resolves").into_value())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            let results = handle.join().expect("worker thread completes");
            assert!(results.iter().all(|value| value.as_ref() == Some(&expected)));
        }
    });
}
