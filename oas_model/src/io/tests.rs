//! Unit tests for the generic reader and writer over both backends.

use rstest::rstest;
use serde_json::json;

use crate::error::OasError;
use crate::model::{ModelNode, Value};
use crate::registry::ModelType;
use crate::tree::{DocumentTree, MetaInstance, MetaValue, MetadataTree};

use super::source::{Format, parse_text, serialize_tree};
use super::{Reader, ReaderOptions, SpecVersion, UnknownKeyPolicy, Writer};

fn read_document(tree: &serde_json::Value, kind: ModelType) -> ModelNode {
    Reader::new(&DocumentTree)
        .read(tree, kind)
        .unwrap_or_else(|e| panic!("read failed: {e}"))
}

#[test]
fn reads_nested_kinds_and_unwrapped_paths() {
    let tree = json!({
        "openapi": "3.1.0",
        "info": {"title": "Pets", "version": "1.0.0"},
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "tags": ["pets"]
                }
            },
            "x-paths-note": "kept",
        }
    });
    let document = read_document(&tree, ModelType::OpenApi);

    assert_eq!(document.string_property("openapi").as_deref(), Some("3.1.0"));

    let info = document.get("info").unwrap_or_else(|e| panic!("{e}"));
    let info = info.as_ref().and_then(Value::as_model);
    assert!(info.is_some_and(|i| i.string_property("title").as_deref() == Some("Pets")));

    let paths = document
        .get("paths")
        .unwrap_or_else(|e| panic!("{e}"))
        .and_then(|v| v.as_model().cloned());
    let paths = paths.unwrap_or_else(|| panic!("paths missing"));
    assert_eq!(paths.extension("x-paths-note"), Some(json!("kept")));

    let items = paths.get("pathItems").unwrap_or_else(|e| panic!("{e}"));
    let items = items.as_ref().and_then(Value::as_map);
    assert!(items.is_some_and(|m| m.contains_key("/pets")));
}

#[test]
fn unknown_keys_are_dropped_by_default() {
    let tree = json!({"title": "Pets", "version": "1.0.0", "futureField": 3});
    let info = read_document(&tree, ModelType::Info);
    assert_eq!(info.get("futureField").unwrap_or_else(|e| panic!("{e}")), None);
}

#[test]
fn unknown_keys_can_be_strict() {
    let tree = json!({"title": "Pets", "futureField": 3});
    let options = ReaderOptions {
        unknown_keys: UnknownKeyPolicy::Error,
    };
    let outcome = Reader::with_options(&DocumentTree, options).read(&tree, ModelType::Info);
    assert!(
        outcome
            .err()
            .is_some_and(|e| matches!(&*e, OasError::UnknownProperty { kind: "Info", .. }))
    );
}

#[test]
fn schema_keywords_outside_the_table_are_retained() {
    let tree = json!({"type": "object", "x-vendor": true, "customAnnotation": {"a": [1]}});
    let schema = read_document(&tree, ModelType::Schema);
    assert_eq!(
        schema.get("customAnnotation").unwrap_or_else(|e| panic!("{e}")),
        Some(Value::from(json!({"a": [1]})))
    );
    assert_eq!(schema.extension("x-vendor"), Some(json!(true)));
}

#[test]
fn scalar_type_is_read_as_a_singleton_list() {
    let tree = json!({"type": "string"});
    let schema = read_document(&tree, ModelType::Schema);
    assert_eq!(schema.type_list(), Some(vec!["string".to_owned()]));
}

#[test]
fn legacy_nullable_routes_through_the_compatibility_layer() {
    // `nullable` appears before `type`; routing applies it last regardless.
    let tree = json!({"nullable": true, "type": "string"});
    let schema = read_document(&tree, ModelType::Schema);
    assert_eq!(
        schema.type_list(),
        Some(vec!["string".to_owned(), "null".to_owned()])
    );
    assert_eq!(schema.nullable(), Some(true));
}

#[test]
fn references_short_circuit_property_population() {
    let tree = json!({
        "$ref": "Widget",
        "description": "overridden description",
        "title": "ignored"
    });
    let schema = read_document(&tree, ModelType::Schema);
    assert!(schema.is_reference());
    assert_eq!(
        schema.reference().as_deref(),
        Some("#/components/schemas/Widget")
    );
    assert_eq!(
        schema.description().as_deref(),
        Some("overridden description")
    );
    assert_eq!(schema.get("title").unwrap_or_else(|e| panic!("{e}")), None);
}

#[test]
fn boolean_schemas_read_from_bare_booleans() {
    let tree = json!({"additionalProperties": false, "type": "object"});
    let schema = read_document(&tree, ModelType::Schema);
    let additional = schema
        .get("additionalProperties")
        .unwrap_or_else(|e| panic!("{e}"))
        .and_then(|v| v.as_model().cloned());
    assert!(additional.is_some_and(|n| n.boolean_value() == Some(false)));
}

#[test]
fn metadata_instances_read_with_repeatable_siblings() {
    let source = MetadataTree;
    let node = MetaValue::from(
        MetaInstance::new("Operation")
            .field("operationId", MetaValue::string("listPets"))
            .field("tags", MetaValue::string("pets"))
            .field("tags", MetaValue::string("store"))
            .field(
                "externalDocs",
                MetaInstance::new("ExternalDocumentation")
                    .field("url", MetaValue::string("https://docs.example")),
            ),
    );
    let operation = Reader::new(&source)
        .read(&node, ModelType::Operation)
        .unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(
        operation.get("tags").unwrap_or_else(|e| panic!("{e}")),
        Some(Value::List(vec![Value::from("pets"), Value::from("store")]))
    );
    let docs = operation
        .get("externalDocs")
        .unwrap_or_else(|e| panic!("{e}"))
        .and_then(|v| v.as_model().cloned());
    assert!(docs.is_some_and(|d| d.string_property("url").is_some()));
}

#[test]
fn metadata_references_use_the_bare_ref_field() {
    let source = MetadataTree;
    let node = MetaValue::from(
        MetaInstance::new("Schema").field("ref", MetaValue::string("Widget")),
    );
    let schema = Reader::new(&source)
        .read(&node, ModelType::Schema)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        schema.reference().as_deref(),
        Some("#/components/schemas/Widget")
    );
}

#[test]
fn writer_inverts_the_reader() {
    let tree = json!({
        "openapi": "3.1.0",
        "info": {"title": "Pets", "version": "1.0.0", "x-track": [1, 2]},
        "paths": {
            "/pets": {
                "get": {"operationId": "listPets", "deprecated": false}
            }
        },
        "components": {
            "schemas": {
                "Pet": {"type": ["object"], "required": ["name"]}
            }
        }
    });
    let document = read_document(&tree, ModelType::OpenApi);
    let written = Writer::new(&DocumentTree).write(&document);
    let reread = read_document(&written, ModelType::OpenApi);
    assert_eq!(reread, document);
    assert_eq!(written, tree);
}

#[test]
fn writer_collapses_references_to_a_pointer() {
    let schema = ModelNode::new_unchecked(ModelType::Schema);
    schema.set_reference(Some("Widget")).unwrap_or_else(|e| panic!("{e}"));
    let written = Writer::new(&DocumentTree).write(&schema);
    assert_eq!(written, json!({"$ref": "#/components/schemas/Widget"}));
}

#[test]
fn writer_emits_boolean_schemas_as_booleans() {
    let schema = ModelNode::new_unchecked(ModelType::Schema);
    schema
        .set(
            "additionalProperties",
            Some(Value::from(ModelNode::boolean_schema(false))),
        )
        .unwrap_or_else(|e| panic!("{e}"));
    let written = Writer::new(&DocumentTree).write(&schema);
    assert_eq!(written, json!({"additionalProperties": false}));
}

#[rstest]
#[case(SpecVersion::V3_1, json!({"type": ["string", "null"]}))]
#[case(SpecVersion::V3_0, json!({"type": "string", "nullable": true}))]
fn schema_nullability_follows_the_target_version(
    #[case] version: SpecVersion,
    #[case] expected: serde_json::Value,
) {
    let schema = ModelNode::new_unchecked(ModelType::Schema);
    schema.set_type_list(Some(vec!["string".to_owned()]));
    schema.set_nullable(Some(true));
    let written = Writer::with_version(&DocumentTree, version).write(&schema);
    assert_eq!(written, expected);
}

#[test]
fn flag_only_nullability_still_reaches_the_legacy_wire() {
    let schema = ModelNode::new_unchecked(ModelType::Schema);
    schema.set_nullable(Some(true));
    let written = Writer::with_version(&DocumentTree, SpecVersion::V3_0).write(&schema);
    assert_eq!(written, json!({"nullable": true}));
}

#[rstest]
#[case("openapi.json", Some(Format::Json))]
#[case("openapi.YAML", Some(Format::Yaml))]
#[case("openapi.yml", Some(Format::Yaml))]
#[case("openapi.txt", None)]
fn formats_detect_from_extensions(#[case] path: &str, #[case] expected: Option<Format>) {
    assert_eq!(Format::from_path(camino::Utf8Path::new(path)), expected);
}

#[test]
fn json_text_parses_and_serializes() {
    let tree = parse_text(r#"{"openapi": "3.1.0"}"#, Format::Json)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(tree, json!({"openapi": "3.1.0"}));
    let text = serialize_tree(&tree, Format::Json).unwrap_or_else(|e| panic!("{e}"));
    assert!(text.contains("\"openapi\""));
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_text_parses_and_serializes() {
    let tree = parse_text("openapi: 3.1.0\ninfo:\n  title: Pets\n", Format::Yaml)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(tree, json!({"openapi": "3.1.0", "info": {"title": "Pets"}}));
    let text = serialize_tree(&tree, Format::Yaml).unwrap_or_else(|e| panic!("{e}"));
    assert!(text.contains("openapi:"));
}

#[test]
fn malformed_text_is_a_parse_error() {
    let outcome = parse_text("{", Format::Json);
    assert!(
        outcome
            .err()
            .is_some_and(|e| matches!(&*e, OasError::Parse { format: "JSON", .. }))
    );
}
