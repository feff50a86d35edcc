//! End-to-end assembly: three partial sources folded in precedence order,
//! filtered, and serialized.

use camino::Utf8PathBuf;
use oas_model::assembly::{AssemblyContext, DocumentFilter, DocumentSource, FilterOutcome};
use oas_model::io::Reader;
use oas_model::io::source::load_document_path;
use oas_model::model::{ModelNode, Value};
use oas_model::registry::ModelType;
use oas_model::tree::DocumentTree;
use oas_model_test_helpers::{declarations_document, petstore_document, reader_document};

fn read_tree(tree: &serde_json::Value) -> ModelNode {
    Reader::new(&DocumentTree)
        .read(tree, ModelType::OpenApi)
        .unwrap_or_else(|e| panic!("read failed: {e}"))
}

fn assemble_all() -> ModelNode {
    let mut context = AssemblyContext::new();
    context.supply(DocumentSource::StaticFile, read_tree(&petstore_document()));
    context.supply(DocumentSource::Declarations, read_tree(&declarations_document()));
    context.supply(DocumentSource::Reader, read_tree(&reader_document()));
    context.assemble().unwrap_or_else(|e| panic!("assemble failed: {e}"))
}

fn model_at(parent: &ModelNode, wire: &str) -> ModelNode {
    parent
        .get(wire)
        .unwrap_or_else(|e| panic!("{e}"))
        .and_then(|v| v.as_model().cloned())
        .unwrap_or_else(|| panic!("'{wire}' missing"))
}

#[test]
fn the_static_file_holds_scalar_precedence() {
    let document = assemble_all();
    let info = model_at(&document, "info");
    assert_eq!(info.string_property("title").as_deref(), Some("Pet Store"));
    assert_eq!(info.string_property("version").as_deref(), Some("1.0.0"));
    // The reader still fills the gap it alone covers.
    assert_eq!(
        info.description().as_deref(),
        Some("Supplied programmatically")
    );
}

#[test]
fn declarations_extend_paths_and_operations() {
    let document = assemble_all();
    let paths = model_at(&document, "paths");
    let pets = paths
        .all_properties()
        .get("/pets")
        .and_then(Value::as_model)
        .cloned()
        .unwrap_or_else(|| panic!("/pets missing"));

    // The static operation gained the scanner's summary.
    let get = model_at(&pets, "get");
    assert_eq!(get.summary().as_deref(), Some("List all pets"));
    assert_eq!(get.string_property("operationId").as_deref(), Some("listPets"));

    // The scanner-only operation was added outright.
    let post = model_at(&pets, "post");
    assert_eq!(post.string_property("operationId").as_deref(), Some("createPet"));
}

#[test]
fn component_schemas_union_across_sources() {
    let document = assemble_all();
    let components = model_at(&document, "components");
    let schemas = components
        .get("schemas")
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("schemas missing"));
    let schemas = schemas.as_map().cloned().unwrap_or_else(|| panic!("not a map"));

    let pet = schemas
        .get("Pet")
        .and_then(Value::as_model)
        .cloned()
        .unwrap_or_else(|| panic!("Pet missing"));
    let properties = pet
        .get("properties")
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("properties missing"));
    let properties = properties.as_map().cloned().unwrap_or_else(|| panic!("not a map"));

    // Static keys kept, scanner-only key added.
    assert!(properties.contains_key("name"));
    assert!(properties.contains_key("tag"));
    assert!(properties.contains_key("age"));
}

#[test]
fn tags_merge_by_name_across_sources() {
    let document = assemble_all();
    let tags = document
        .get("tags")
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("tags missing"));
    let tags = tags.as_list().map(<[Value]>::to_vec).unwrap_or_else(|| panic!("not a list"));
    assert_eq!(tags.len(), 2);

    let pets = tags
        .first()
        .and_then(Value::as_model)
        .cloned()
        .unwrap_or_else(|| panic!("pets tag missing"));
    // The static description was not overwritten by the bare scanner tag.
    assert_eq!(pets.description().as_deref(), Some("Pet operations"));
}

struct DropStoreTag;

impl DocumentFilter for DropStoreTag {
    fn filter_model(&mut self, kind: ModelType, node: &ModelNode) -> FilterOutcome {
        if kind == ModelType::Tag && node.name_property().as_deref() == Some("store") {
            FilterOutcome::Remove
        } else {
            FilterOutcome::Keep
        }
    }
}

#[test]
fn the_filter_stage_runs_on_the_merged_document() {
    let mut context = AssemblyContext::new();
    context.supply(DocumentSource::StaticFile, read_tree(&petstore_document()));
    context.supply(DocumentSource::Declarations, read_tree(&declarations_document()));
    context.assemble().unwrap_or_else(|e| panic!("{e}"));
    context.apply_filter(&mut DropStoreTag).unwrap_or_else(|e| panic!("{e}"));

    let document = context.finalize().unwrap_or_else(|e| panic!("{e}"));
    let tags = document
        .get("tags")
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("tags missing"));
    let names: Vec<String> = tags
        .as_list()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_model)
                .filter_map(ModelNode::name_property)
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(names, vec!["pets".to_owned()]);
}

#[test]
fn static_files_load_from_disk_by_extension() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let path = dir.path().join("openapi.json");
    let contents = serde_json::to_string(&petstore_document()).unwrap_or_else(|e| panic!("{e}"));
    std::fs::write(&path, contents).unwrap_or_else(|e| panic!("{e}"));

    let utf8 = Utf8PathBuf::from_path_buf(path).unwrap_or_else(|p| panic!("non-UTF-8 path: {p:?}"));
    let document = load_document_path(&utf8).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(document, read_tree(&petstore_document()));
}

#[test]
fn a_dangling_reference_resolves_after_a_later_source_supplies_it() {
    use oas_model::model::reference::resolve;

    let mut context = AssemblyContext::new();
    // The static file references a schema it does not define.
    let static_doc = read_tree(&serde_json::json!({
        "openapi": "3.1.0",
        "paths": {
            "/pets": {
                "get": {
                    "responses": {
                        "200": {
                            "description": "ok",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Pet"}
                                }
                            }
                        }
                    }
                }
            }
        }
    }));
    assert!(resolve(&static_doc, "#/components/schemas/Pet").is_none());

    context.supply(DocumentSource::StaticFile, static_doc);
    context.supply(DocumentSource::Declarations, read_tree(&declarations_document()));
    let document = context.assemble().unwrap_or_else(|e| panic!("{e}"));

    let resolved = resolve(&document, "#/components/schemas/Pet");
    assert!(resolved.is_some_and(|schema| {
        schema
            .get("properties")
            .unwrap_or_else(|e| panic!("{e}"))
            .is_some()
    }));
}
