//! Path handling through the public tree API

use dotconf::{ConfigTree, PathBuf, Value, path};

use crate::helpers::*;

#[test]
fn test_empty_segments_are_ignored() {
    let tree = sample_tree();
    assert_eq!(tree.get("a..b"), tree.get("a.b"));
    assert_eq!(tree.get(".a.b."), Some(&Value::from("c")));
    assert_eq!(tree.get("..."), Some(tree.as_value()));
}

#[test]
fn test_empty_path_addresses_root() {
    let tree = sample_tree();
    assert_eq!(tree.get(""), Some(&sample_value()));
    assert!(tree.has(""));
    assert_eq!(tree.with("", "ignored"), tree);
    assert_eq!(tree.without(""), tree);
}

#[test]
fn test_pathbuf_and_macro_work_as_paths() {
    let tree = ConfigTree::new().with(path!("servers", 0, "host"), "db1");
    assert_text_values(&tree, &[("servers.0.host", "db1")]);

    let host = PathBuf::new().push("servers").push("0").push("host");
    assert_eq!(tree.get(&host), Some(&Value::from("db1")));

    let parent = host.parent().unwrap();
    assert_eq!(parent.as_str(), "servers.0");
    assert!(tree.get(&parent).unwrap().is_map());
    assert!(tree.get("servers").unwrap().is_list());
}

#[test]
fn test_index_segments_must_be_canonical() {
    let tree = sample_tree();
    assert_eq!(tree.get("d.0"), Some(&Value::from(1)));
    assert_eq!(tree.get("d.2"), Some(&Value::from(3)));
    assert!(!tree.has("d.3"));
    assert!(!tree.has("d.00"));
    assert!(!tree.has("d.-1"));
}

#[test]
fn test_traversal_through_scalar_is_absent() {
    let tree = sample_tree();
    assert!(!tree.has("e.x"));
    assert!(!tree.has("a.b.c"));
    assert_eq!(tree.get("e.x.y"), None);
    assert_eq!(tree.without("e.x"), tree);
}

#[test]
fn test_path_from_string() {
    let path: PathBuf = "a..b.".parse().unwrap();
    assert_eq!(path, PathBuf::from("a.b"));
    assert_eq!(path.components().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(path.to_string(), "a.b");
    assert_eq!(sample_tree().get(path), Some(&Value::from("c")));
}

#[test]
fn test_path_segments_from_the_end() {
    let path = PathBuf::from("servers.0.host.");
    assert_eq!(path.last(), Some("host"));
    assert_eq!(
        path.components().rev().collect::<Vec<_>>(),
        vec!["host", "0", "servers"]
    );
    assert_eq!(dotconf::path::segments("a..b").next_back(), Some("b"));
    assert_eq!(PathBuf::from("").last(), None);
}
