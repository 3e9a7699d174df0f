use dotconf::{CleanPolicy, ConfigTree, Value};

use crate::helpers::*;

#[test]
fn test_with_creates_intermediate_maps() {
    let tree = ConfigTree::new().with("a.b.c", 1);
    assert_eq!(
        tree.to_value(),
        Value::map([("a", Value::map([("b", Value::map([("c", 1)]))]))])
    );
}

#[test]
fn test_with_overwrites_scalars_on_the_way() {
    let tree = sample_tree().with("e.nested", "value");
    assert_eq!(tree.get("e"), Some(&Value::map([("nested", "value")])));
}

#[test]
fn test_with_leaves_original_untouched() {
    let tree = sample_tree();
    let snapshot = tree.to_value();

    let updated = tree.with("a.b", "changed").with("new", 1);
    assert_eq!(updated.get("a.b"), Some(&Value::from("changed")));
    assert_unchanged(&tree, &snapshot);
}

#[test]
fn test_with_null_removes_under_strip_nulls() {
    let tree = sample_tree();
    assert_eq!(tree.with("a.b", Value::Null), tree.without("a.b"));
    assert!(!tree.with("e", Value::Null).has("e"));
}

#[test]
fn test_with_null_kept_without_policy() {
    let tree = ConfigTree::with_policy(sample_value(), CleanPolicy::NONE).with("e", Value::Null);
    assert!(tree.has("e"));
    assert!(tree.get("e").unwrap().is_null());
}

#[test]
fn test_with_index_extends_list() {
    let tree = sample_tree().with("d.3", 4);
    assert_eq!(tree.get("d"), Some(&Value::list([1, 2, 3, 4])));
    assert!(tree.get("d").unwrap().is_list());

    // A gap turns the list into a map
    let gapped = sample_tree().with("d.5", 6);
    assert!(gapped.get("d").unwrap().is_map());
    assert_eq!(gapped.get_as::<i64>("d.5"), Some(6));
}

#[test]
fn test_index_keys_set_out_of_order_equal_a_list() {
    let shuffled = ConfigTree::new()
        .with("d.0", "a")
        .with("d.2", "c")
        .with("d.1", "b");
    let ordered = ConfigTree::new()
        .with("d.0", "a")
        .with("d.1", "b")
        .with("d.2", "c");
    assert!(ordered.get("d").unwrap().is_list());
    assert_eq!(shuffled, ordered);
    assert_eq!(shuffled.get("d"), Some(&Value::list(["a", "b", "c"])));
    assert_eq!(shuffled.without("d.1"), ordered.without("d.1"));
}

#[test]
fn test_with_named_key_turns_list_into_map() {
    let tree = sample_tree().with("d.name", "x");
    let d = tree.get("d").unwrap();
    assert!(d.is_map());
    assert_eq!(tree.get_as::<i64>("d.0"), Some(1));
    assert_eq!(tree.get_as::<&str>("d.name"), Some("x"));
}

#[test]
fn test_without_removes_entry() {
    let tree = sample_tree();
    let removed = tree.without("a.b");
    assert!(!removed.has("a.b"));
    assert!(tree.has("a.b"));
    assert!(removed.has("e"));
}

#[test]
fn test_without_missing_path_is_noop() {
    let tree = sample_tree();
    assert_eq!(tree.without("a.x"), tree);
    assert_eq!(tree.without("missing.deep.path"), tree);
    assert_eq!(tree.without("d.7"), tree);
}

#[test]
fn test_without_keeps_empty_parent_by_default() {
    let removed = sample_tree().without("a.b");
    assert!(removed.has("a"));
    assert!(removed.get("a").unwrap().is_empty_container());
}

#[test]
fn test_without_collapses_empty_parents_under_strip_empty() {
    let tree = ConfigTree::with_policy(sample_value(), CleanPolicy::ALL);
    let removed = tree.without("a.b");
    assert!(!removed.has("a"));
    assert_eq!(removed.len(), 2);
}

#[test]
fn test_without_list_item_leaves_gap() {
    let tree = sample_tree().without("d.1");
    let d = tree.get("d").unwrap();
    assert!(d.is_map());
    assert_eq!(d, &Value::map([("0", 1), ("2", 3)]));
}

#[test]
fn test_without_last_list_item_keeps_list() {
    let tree = sample_tree().without("d.2");
    assert_eq!(tree.get("d"), Some(&Value::list([1, 2])));
    assert!(tree.get("d").unwrap().is_list());
}

#[test]
fn test_without_is_idempotent() {
    let tree = server_config();
    let once = tree.without("server.port");
    assert_eq!(once.without("server.port"), once);
}

#[test]
fn test_split_subtree() {
    let tree = server_config();
    let server = tree.split("server");
    assert_text_values(&server, &[("host", "localhost"), ("aliases.0", "example.org")]);
    assert_eq!(server.policy(), tree.policy());

    // Changing the split leaves the source alone
    let changed = server.with("host", "remote");
    assert_text_values(&tree, &[("server.host", "localhost")]);
    assert_text_values(&changed, &[("host", "remote")]);
}

#[test]
fn test_split_scalar_and_missing() {
    let tree = server_config();
    let port = tree.split("server.port");
    assert_eq!(port.to_value(), Value::list([8080]));

    let missing = tree.split("nowhere");
    assert!(missing.is_empty());
}

#[test]
fn test_split_inherits_policy() {
    let tree = ConfigTree::with_policy(sample_value(), CleanPolicy::NONE);
    let split = tree.split("a");
    assert_eq!(split.policy(), CleanPolicy::NONE);
    assert!(split.with("b", Value::Null).has("b"));
}

#[test]
fn test_from_path_value_pairs() {
    let tree: ConfigTree = [("server.host", Value::from("h")), ("server.port", Value::from(1))]
        .into_iter()
        .collect();
    assert_eq!(tree.get_as::<&str>("server.host"), Some("h"));
    assert_eq!(tree.count(), 2);
}
