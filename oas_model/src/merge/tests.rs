//! Unit tests for the merge engine.

use serde_json::json;

use crate::model::{ModelNode, Value};
use crate::registry::ModelType;

use super::merge;

fn node(kind: ModelType) -> ModelNode {
    ModelNode::new_unchecked(kind)
}

fn set(target: &ModelNode, wire: &str, value: Value) {
    target.set(wire, Some(value)).unwrap_or_else(|e| panic!("{e}"));
}

fn tag(name: &str, description: Option<&str>) -> ModelNode {
    let tag = node(ModelType::Tag);
    set(&tag, "name", Value::from(name));
    if let Some(description) = description {
        set(&tag, "description", Value::from(description));
    }
    tag
}

#[test]
fn merging_an_empty_bag_changes_nothing() {
    let target = node(ModelType::OpenApi);
    set(&target, "openapi", Value::from("3.1.0"));
    let info = node(ModelType::Info);
    set(&info, "title", Value::from("Pets"));
    set(&target, "info", Value::from(info));

    let snapshot = target.deep_copy();
    merge(&target, &node(ModelType::OpenApi));
    assert_eq!(target, snapshot);
}

#[test]
fn preserve_value_keeps_the_occupying_version_marker() {
    let target = node(ModelType::OpenApi);
    set(&target, "openapi", Value::from("3.0.3"));
    let source = node(ModelType::OpenApi);
    set(&source, "openapi", Value::from("3.1.0"));

    merge(&target, &source);
    assert_eq!(target.string_property("openapi").as_deref(), Some("3.0.3"));
}

#[test]
fn preserve_value_fills_an_absent_version_marker() {
    let target = node(ModelType::OpenApi);
    let source = node(ModelType::OpenApi);
    set(&source, "openapi", Value::from("3.1.0"));

    merge(&target, &source);
    assert_eq!(target.string_property("openapi").as_deref(), Some("3.1.0"));
}

#[test]
fn maps_union_key_by_key() {
    let target = node(ModelType::Components);
    let s1 = node(ModelType::Schema);
    set(&s1, "title", Value::from("A"));
    target.put_entry("schemas", "A", Value::from(s1)).unwrap_or_else(|e| panic!("{e}"));

    let source = node(ModelType::Components);
    let s2 = node(ModelType::Schema);
    set(&s2, "title", Value::from("B"));
    source.put_entry("schemas", "B", Value::from(s2)).unwrap_or_else(|e| panic!("{e}"));

    merge(&target, &source);

    let schemas = target.get("schemas").unwrap_or_else(|e| panic!("{e}"));
    let schemas = schemas.as_ref().and_then(Value::as_map);
    assert!(schemas.is_some_and(|m| m.len() == 2 && m.contains_key("A") && m.contains_key("B")));
}

#[test]
fn occupied_scalars_win_under_the_default_directive() {
    let target = node(ModelType::Info);
    set(&target, "title", Value::from("From the static file"));
    let source = node(ModelType::Info);
    set(&source, "title", Value::from("From annotations"));
    set(&source, "version", Value::from("2.0.0"));

    merge(&target, &source);
    assert_eq!(
        target.string_property("title").as_deref(),
        Some("From the static file")
    );
    // Gaps are still filled from the incoming side.
    assert_eq!(target.string_property("version").as_deref(), Some("2.0.0"));
}

#[test]
fn nested_models_merge_recursively() {
    let target = node(ModelType::OpenApi);
    let target_info = node(ModelType::Info);
    set(&target_info, "title", Value::from("Pets"));
    set(&target, "info", Value::from(target_info));

    let source = node(ModelType::OpenApi);
    let source_info = node(ModelType::Info);
    set(&source_info, "title", Value::from("ignored"));
    set(&source_info, "version", Value::from("1.0.0"));
    set(&source, "info", Value::from(source_info));

    merge(&target, &source);

    let info = target
        .get("info")
        .unwrap_or_else(|e| panic!("{e}"))
        .and_then(|v| v.as_model().cloned());
    let info = info.unwrap_or_else(|| panic!("info missing"));
    assert_eq!(info.string_property("title").as_deref(), Some("Pets"));
    assert_eq!(info.string_property("version").as_deref(), Some("1.0.0"));
}

#[test]
fn named_tags_merge_by_identity() {
    let target = node(ModelType::OpenApi);
    set(
        &target,
        "tags",
        Value::List(vec![Value::from(tag("pets", None))]),
    );

    let source = node(ModelType::OpenApi);
    set(
        &source,
        "tags",
        Value::List(vec![
            Value::from(tag("pets", Some("Pet operations"))),
            Value::from(tag("store", None)),
        ]),
    );

    merge(&target, &source);

    let tags = target.get("tags").unwrap_or_else(|e| panic!("{e}"));
    let tags = tags.as_ref().and_then(Value::as_list).map(<[Value]>::to_vec);
    let tags = tags.unwrap_or_else(|| panic!("tags missing"));
    assert_eq!(tags.len(), 2);

    let pets = tags
        .first()
        .and_then(Value::as_model)
        .cloned()
        .unwrap_or_else(|| panic!("pets tag missing"));
    // The matched tag was merged, not duplicated.
    assert_eq!(pets.description().as_deref(), Some("Pet operations"));
}

#[test]
fn scalar_lists_union_as_sets() {
    let target = node(ModelType::Operation);
    set(
        &target,
        "tags",
        Value::List(vec![Value::from("pets"), Value::from("store")]),
    );
    let source = node(ModelType::Operation);
    set(
        &source,
        "tags",
        Value::List(vec![Value::from("store"), Value::from("admin")]),
    );

    merge(&target, &source);
    let tags = target.get("tags").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        tags,
        Some(Value::List(vec![
            Value::from("pets"),
            Value::from("store"),
            Value::from("admin"),
        ]))
    );
}

#[test]
fn boolean_schemas_are_atomic_in_either_position() {
    let boolean = ModelNode::boolean_schema(true);
    let object = node(ModelType::Schema);
    set(&object, "type", Value::List(vec![Value::from("string")]));

    let boolean_snapshot = boolean.deep_copy();
    let object_snapshot = object.deep_copy();

    merge(&boolean, &object);
    assert_eq!(boolean, boolean_snapshot);

    merge(&object, &boolean);
    assert_eq!(object, object_snapshot);
}

#[test]
fn kind_mismatches_are_skipped_not_raised() {
    let target = node(ModelType::Info);
    set(&target, "title", Value::from("Pets"));
    let snapshot = target.deep_copy();

    merge(&target, &node(ModelType::Contact));
    assert_eq!(target, snapshot);
}

#[test]
fn extensions_merge_like_maps() {
    let target = node(ModelType::Info);
    target.add_extension("x-owner", json!("platform")).unwrap_or_else(|e| panic!("{e}"));

    let source = node(ModelType::Info);
    source.add_extension("x-owner", json!("ignored")).unwrap_or_else(|e| panic!("{e}"));
    source
        .add_extension("x-audit", json!({"level": 2}))
        .unwrap_or_else(|e| panic!("{e}"));

    merge(&target, &source);
    assert_eq!(target.extension("x-owner"), Some(json!("platform")));
    assert_eq!(target.extension("x-audit"), Some(json!({"level": 2})));
}

#[test]
fn unwrapped_entries_merge_alongside_declared_properties() {
    let target = node(ModelType::Paths);
    target
        .put_entry("pathItems", "/pets", Value::from(node(ModelType::PathItem)))
        .unwrap_or_else(|e| panic!("{e}"));

    let source = node(ModelType::Paths);
    let source_item = node(ModelType::PathItem);
    set(&source_item, "summary", Value::from("Pet listing"));
    source
        .put_entry("pathItems", "/pets", Value::from(source_item))
        .unwrap_or_else(|e| panic!("{e}"));
    source
        .put_entry("pathItems", "/stores", Value::from(node(ModelType::PathItem)))
        .unwrap_or_else(|e| panic!("{e}"));

    merge(&target, &source);

    let view = target.get("pathItems").unwrap_or_else(|e| panic!("{e}"));
    let view = view.as_ref().and_then(Value::as_map);
    assert!(view.is_some_and(|m| m.len() == 2));

    let pets = target
        .all_properties()
        .get("/pets")
        .and_then(Value::as_model)
        .cloned();
    assert!(pets.is_some_and(|item| item.summary().as_deref() == Some("Pet listing")));
}

#[test]
fn deep_copies_detach_merged_content_from_the_source() {
    let target = node(ModelType::OpenApi);
    let source = node(ModelType::OpenApi);
    let source_info = node(ModelType::Info);
    set(&source_info, "title", Value::from("Pets"));
    set(&source, "info", Value::from(source_info.clone()));

    merge(&target, &source);
    // Mutating the source afterwards must not leak into the target.
    set(&source_info, "title", Value::from("changed"));

    let info = target
        .get("info")
        .unwrap_or_else(|e| panic!("{e}"))
        .and_then(|v| v.as_model().cloned());
    assert!(info.is_some_and(|i| i.string_property("title").as_deref() == Some("Pets")));
}
