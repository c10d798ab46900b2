//! Tests for TreeFlattener

use serde_json::{json, Value};

use rsshape::util::testing;
use rsshape::{flatten_tree, FlattenOptions, Record, TreeFlattener};

fn flat_value(flat: Vec<Record>) -> Value {
    Value::Array(flat.into_iter().map(Value::Object).collect())
}

fn documented_tree() -> Value {
    json!([
        {"n": "a", "nn": "aa", "children": [
            {"n": "b", "nn": "bb", "children": [{"n": "c", "nn": "cc"}]},
            {"n": "d", "nn": "dd", "children": [{"n": "e", "nn": "ee"}, {"n": "f", "nn": "ff"}]}
        ]}
    ])
}

#[test]
fn given_nested_tree_when_flattening_then_assigns_preorder_ids() {
    testing::init_test_setup();

    // Act
    let flat = TreeFlattener::default()
        .flatten(documented_tree().as_array().unwrap())
        .unwrap();

    // Assert
    assert_eq!(
        flat_value(flat),
        json!([
            {"n": "a", "nn": "aa", "id": 1, "pid": 0},
            {"n": "b", "nn": "bb", "id": 2, "pid": 1},
            {"n": "c", "nn": "cc", "id": 3, "pid": 2},
            {"n": "d", "nn": "dd", "id": 4, "pid": 1},
            {"n": "e", "nn": "ee", "id": 5, "pid": 4},
            {"n": "f", "nn": "ff", "id": 6, "pid": 4}
        ])
    );
}

#[test]
fn given_several_top_level_trees_when_flattening_then_counter_is_never_reset() {
    let tree = json!([
        {"n": "a", "children": [{"n": "a1"}, {"n": "a2"}]},
        {"n": "b", "children": [{"n": "b1"}]}
    ]);

    let flat = TreeFlattener::default()
        .flatten(tree.as_array().unwrap())
        .unwrap();

    let ids: Vec<_> = flat.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    let pids: Vec<_> = flat.iter().map(|r| r["pid"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(pids, vec![0, 1, 1, 0, 4]);
}

#[test]
fn given_custom_field_names_when_flattening_then_uses_them() {
    let tree = json!([{"n": "a", "sub": [{"n": "b"}]}]);
    let options = FlattenOptions {
        child_field: "sub".into(),
        id_field: "key".into(),
        parent_id_field: "parent".into(),
        root_id: -1,
    };

    let flat = flatten_tree(tree.as_array().unwrap(), &options).unwrap();

    assert_eq!(
        flat_value(flat),
        json!([
            {"n": "a", "key": 1, "parent": -1},
            {"n": "b", "key": 2, "parent": 1}
        ])
    );
}

#[test]
fn given_existing_id_fields_when_flattening_then_overwrites_them() {
    let tree = json!([{"id": 77, "pid": 99, "n": "a"}]);

    let flat = TreeFlattener::default()
        .flatten(tree.as_array().unwrap())
        .unwrap();

    assert_eq!(flat_value(flat), json!([{"id": 1, "pid": 0, "n": "a"}]));
}

#[test]
fn given_empty_tree_when_flattening_then_returns_empty() {
    let flat = TreeFlattener::default().flatten(&[]).unwrap();
    assert!(flat.is_empty());
}

#[test]
fn given_two_calls_when_flattening_then_each_starts_at_one() {
    let flattener = TreeFlattener::default();
    let tree = json!([{"n": "a"}]);

    let first = flattener.flatten(tree.as_array().unwrap()).unwrap();
    let second = flattener.flatten(tree.as_array().unwrap()).unwrap();

    assert_eq!(first[0]["id"], json!(1));
    assert_eq!(second[0]["id"], json!(1));
}
