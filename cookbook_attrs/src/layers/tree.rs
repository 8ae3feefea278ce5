//! Nested JSON entry trees backing override layers.

use serde_json::{Map, Value};

use crate::path::AttrPath;

/// Overlay `incoming` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - When merging an object into a non-object target, target is initialized to
///   `{}` first.
/// - Objects are merged recursively (keys are added or overwritten, and nested
///   objects are overlaid).
/// - Arrays and scalars replace `target` wholesale (no deep merge for arrays).
///
/// # Examples
///
/// ```rust
/// use cookbook_attrs::layers::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"rvm": {"branch": "stable", "gems": {"x": 1}}});
/// merge_value(&mut acc, json!({"rvm": {"gems": {"y": 2}, "upgrade": "latest"}}));
/// assert_eq!(
///     acc,
///     json!({"rvm": {"branch": "stable", "gems": {"x": 1, "y": 2}, "upgrade": "latest"}})
/// );
///
/// // Arrays replace existing values.
/// merge_value(&mut acc, json!({"rvm": {"gems": [1, 2, 3]}}));
/// assert_eq!(acc["rvm"]["gems"], json!([1, 2, 3]));
/// ```
pub fn merge_value(target: &mut Value, incoming: Value) {
    match incoming {
        Value::Object(map) => merge_object(target, map),
        other => *target = other,
    }
}

fn merge_object(target: &mut Value, map: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}

/// Place `raw` at `path` inside `tree`, creating intermediate objects.
///
/// The value at `path` is replaced rather than merged, so a hash entry set
/// this way fully overrides whatever was there before.
pub(crate) fn insert_at(tree: &mut Value, path: &AttrPath, raw: Value) {
    let mut cursor = tree;
    for segment in path.segments() {
        if !cursor.is_object() {
            *cursor = Value::Object(Map::new());
        }
        let Some(map) = cursor.as_object_mut() else {
            return;
        };
        cursor = map.entry(segment.clone()).or_insert(Value::Null);
    }
    *cursor = raw;
}

/// Walk `path` through nested objects; `null` counts as absent.
pub(crate) fn lookup<'a>(tree: &'a Value, path: &AttrPath) -> Option<&'a Value> {
    let found = path
        .segments()
        .iter()
        .try_fold(tree, |node, segment| node.as_object()?.get(segment))?;
    (!found.is_null()).then_some(found)
}

/// Collect every leaf below `tree` with its slash-joined path.
///
/// Objects are descended; arrays and scalars are leaves. Used to report what
/// a layer contains.
pub(crate) fn leaf_paths(tree: &Value) -> Vec<String> {
    let mut found = Vec::new();
    collect_leaves(tree, &mut Vec::new(), &mut found);
    found
}

fn collect_leaves(node: &Value, prefix: &mut Vec<String>, found: &mut Vec<String>) {
    match node {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                prefix.push(key.clone());
                collect_leaves(child, prefix, found);
                prefix.pop();
            }
        }
        Value::Null => {}
        _ if !prefix.is_empty() => found.push(prefix.join("/")),
        _ => {}
    }
}
