//! Unit tests for the two tree backend adapters.

use rstest::rstest;
use serde_json::{Value, json};

use super::{DocumentTree, MetaInstance, MetaValue, MetadataTree, TreeSink, TreeSource};

#[rstest]
#[case(json!("text"), true, false, false)]
#[case(json!(42), true, false, false)]
#[case(json!([1, 2]), false, true, false)]
#[case(json!({"a": 1}), false, false, true)]
fn document_nodes_classify(
    #[case] node: Value,
    #[case] scalar: bool,
    #[case] array: bool,
    #[case] object: bool,
) {
    let tree = DocumentTree;
    assert_eq!(tree.is_scalar(&node), scalar);
    assert_eq!(tree.is_array(&node), array);
    assert_eq!(tree.is_object(&node), object);
}

#[test]
fn document_entries_preserve_order() {
    let tree = DocumentTree;
    let node = json!({"zebra": 1, "apple": 2, "mango": 3});
    let keys: Vec<&str> = tree.entries(&node).into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["zebra", "apple", "mango"]);
}

#[rstest]
#[case(json!("s"), Some("s".to_owned()))]
#[case(json!(7), Some("7".to_owned()))]
#[case(json!(true), Some("true".to_owned()))]
#[case(json!([1]), None)]
fn document_string_coercion(#[case] value: Value, #[case] expected: Option<String>) {
    assert_eq!(DocumentTree::coerce_string(&value), expected);
}

#[test]
fn document_builders_round_trip() {
    let tree = DocumentTree;
    let mut array = tree.new_array();
    tree.push(&mut array, tree.raw(json!(1)));
    tree.push(&mut array, tree.raw(json!(2)));
    let mut object = tree.new_object(None);
    tree.put(&mut object, "items", tree.finish_array(array));
    let node = tree.finish_object(object);
    assert_eq!(node, json!({"items": [1, 2]}));
}

#[test]
fn metadata_instance_exposes_kind_and_ordered_fields() {
    let tree = MetadataTree;
    let node = MetaValue::from(
        MetaInstance::new("Tag")
            .field("name", MetaValue::string("pets"))
            .field("description", MetaValue::string("Pet operations")),
    );
    assert!(tree.is_object(&node));
    assert_eq!(tree.instance_kind(&node), Some("Tag"));
    let keys: Vec<&str> = tree.entries(&node).into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["name", "description"]);
}

#[test]
fn metadata_repeated_fields_are_kept() {
    let tree = MetadataTree;
    let node = MetaValue::from(
        MetaInstance::new("Operation")
            .field("tags", MetaValue::string("a"))
            .field("tags", MetaValue::string("b")),
    );
    assert_eq!(tree.entries(&node).len(), 2);
}

#[test]
fn metadata_raw_materialization_is_json() {
    let tree = MetadataTree;
    let node = MetaValue::from(
        MetaInstance::new("Extension").field(
            "values",
            MetaValue::Array(vec![MetaValue::string("x"), MetaValue::boolean(true)]),
        ),
    );
    assert_eq!(tree.to_raw(&node), json!({"values": ["x", true]}));
}

#[test]
fn metadata_reference_key_is_bare_ref() {
    assert_eq!(MetadataTree.reference_key(), "ref");
    assert_eq!(DocumentTree.reference_key(), "$ref");
}
