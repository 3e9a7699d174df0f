use std::collections::HashMap;

use dotconf::{CleanPolicy, ConfigTree, Value};

use crate::helpers::*;

#[test]
fn test_count_leaves() {
    assert_eq!(sample_tree().count(), 3);
    assert_eq!(ConfigTree::new().count(), 0);
    // host, port, tls.enabled, aliases (one leaf), logging.level
    assert_eq!(server_config().count(), 5);
}

#[test]
fn test_count_includes_nulls_and_empty_containers() {
    let tree = empty_tree(CleanPolicy::NONE)
        .with("null", Value::Null)
        .with("empty", Value::empty_map())
        .with("nested.value", 1);
    assert_eq!(tree.count(), 3);
}

#[test]
fn test_iterate_top_level_entries() {
    let tree = sample_tree();
    let entries: Vec<(String, Value)> = tree
        .iter()
        .map(|(key, value)| (key.into_owned(), value.clone()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("a".to_string(), Value::map([("b", "c")])),
            ("d".to_string(), Value::list([1, 2, 3])),
            ("e".to_string(), Value::from("f")),
        ]
    );
    assert_eq!(tree.iter().len(), 3);
}

#[test]
fn test_iteration_is_restartable() {
    let tree = server_config();
    let first: Vec<_> = tree.keys().collect();
    let second: Vec<_> = tree.keys().collect();
    assert_eq!(first, second);
    assert_eq!(first, vec!["server", "logging"]);
}

#[test]
fn test_for_loop_over_reference() {
    let tree = sample_tree();
    let mut seen = HashMap::new();
    for (key, value) in &tree {
        seen.insert(key.into_owned(), value.type_name());
    }
    assert_eq!(seen.get("a"), Some(&"map"));
    assert_eq!(seen.get("d"), Some(&"list"));
    assert_eq!(seen.get("e"), Some(&"text"));
}

#[test]
fn test_iterate_list_root() {
    let tree = ConfigTree::from_value(Value::list(["x", "y"]));
    let keys: Vec<_> = tree.keys().collect();
    assert_eq!(keys, vec!["0", "1"]);
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_export_is_a_detached_snapshot() {
    let tree = sample_tree();
    let mut exported = tree.to_value();
    if let Value::Map(entries) = &mut exported {
        std::sync::Arc::make_mut(entries).insert("injected".to_string(), Value::from(1));
    }
    assert!(exported.child("injected").is_some());
    assert!(!tree.has("injected"));
    assert_eq!(tree.to_value(), sample_value());
}

#[test]
fn test_export_json() {
    let tree = sample_tree();
    assert_eq!(
        tree.to_json(),
        serde_json::json!({"a": {"b": "c"}, "d": [1, 2, 3], "e": "f"})
    );
    assert_eq!(tree.to_string(), r#"{"a":{"b":"c"},"d":[1,2,3],"e":"f"}"#);
}

#[test]
fn test_tree_converts_to_value() {
    let tree = sample_tree();
    let by_ref = Value::from(&tree);
    let owned: Value = tree.into();
    assert_eq!(by_ref, owned);
}
