//! The generic, backend-agnostic model writer.

use serde_json::Value as Json;
use tracing::{debug, warn};

use crate::model::{ModelNode, Value, schema::NULL_TYPE};
use crate::registry::ModelType;
use crate::tree::TreeSink;

/// The specification version a document is serialized against.
///
/// The versions differ in how a schema spells nullability: 3.1 carries a
/// `null` member in the `type` list, 3.0 a single `type` plus a boolean
/// `nullable` flag.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SpecVersion {
    /// OpenAPI 3.0.x.
    V3_0,
    /// OpenAPI 3.1.x.
    #[default]
    V3_1,
}

/// Serializes model nodes to a backend tree.
pub struct Writer<'t, K> {
    sink: &'t K,
    version: SpecVersion,
}

impl<'t, K: TreeSink> Writer<'t, K> {
    /// Create a writer targeting the default specification version.
    pub fn new(sink: &'t K) -> Self {
        Self {
            sink,
            version: SpecVersion::default(),
        }
    }

    /// Create a writer targeting an explicit specification version.
    pub fn with_version(sink: &'t K, version: SpecVersion) -> Self {
        Self { sink, version }
    }

    /// Serialize `model` to a tree node.
    ///
    /// Absent properties are skipped, reference bags collapse to their
    /// pointer key plus the permitted overrides, boolean-mode schemas emit a
    /// bare boolean, and cyclic references are skipped with a warning.
    pub fn write(&self, model: &ModelNode) -> K::Node {
        let mut visited = vec![model.ptr_id()];
        self.write_model(model, &mut visited)
    }

    fn write_model(&self, model: &ModelNode, visited: &mut Vec<usize>) -> K::Node {
        if let Some(boolean) = model.boolean_value() {
            return self.sink.raw(Json::Bool(boolean));
        }

        let record = model.record();
        let mut object = self.sink.new_object(Some(record.name()));

        if let Some(pointer) = model.reference() {
            self.sink
                .put(&mut object, "$ref", self.sink.raw(Json::String(pointer)));
            for key in ["description", "summary"] {
                if let Some(text) = model.string_property(key) {
                    self.sink
                        .put(&mut object, key, self.sink.raw(Json::String(text)));
                }
            }
            return self.sink.finish_object(object);
        }

        let legacy_schema =
            model.kind() == ModelType::Schema && self.version == SpecVersion::V3_0;

        for (key, value) in model.all_properties() {
            if legacy_schema && key == "type" {
                self.write_legacy_type(model, &mut object);
                continue;
            }
            if let Some(node) = self.write_value(&value, visited) {
                self.sink.put(&mut object, &key, node);
            }
        }

        // A 3.0 schema whose nullability only lives in the private flag
        // still has it spelled out on the wire.
        if legacy_schema && model.type_list().is_none() && model.nullable() == Some(true) {
            self.sink
                .put(&mut object, "nullable", self.sink.raw(Json::Bool(true)));
        }

        for (name, value) in model.extensions() {
            self.sink.put(&mut object, &name, self.sink.raw(value));
        }

        self.sink.finish_object(object)
    }

    fn write_legacy_type(&self, model: &ModelNode, object: &mut K::ObjectBuilder) {
        let Some(types) = model.type_list() else {
            return;
        };
        if let Some(tag) = model.non_null_type() {
            self.sink
                .put(object, "type", self.sink.raw(Json::String(tag)));
        }
        if types.iter().filter(|t| *t != NULL_TYPE).count() > 1 {
            debug!("3.0 cannot express a multi-type schema; writing the first type only");
        }
        if types.iter().any(|t| t == NULL_TYPE) {
            self.sink
                .put(object, "nullable", self.sink.raw(Json::Bool(true)));
        }
    }

    fn write_value(&self, value: &Value, visited: &mut Vec<usize>) -> Option<K::Node> {
        match value {
            Value::Scalar(Json::Null) => None,
            Value::Scalar(raw) => Some(self.sink.raw(raw.clone())),
            Value::Model(node) => {
                if visited.contains(&node.ptr_id()) {
                    warn!(kind = node.kind().name(), "cyclic reference skipped");
                    return None;
                }
                visited.push(node.ptr_id());
                let written = self.write_model(node, visited);
                visited.pop();
                Some(written)
            }
            Value::List(items) => {
                let mut array = self.sink.new_array();
                for item in items {
                    if let Some(node) = self.write_value(item, visited) {
                        self.sink.push(&mut array, node);
                    }
                }
                Some(self.sink.finish_array(array))
            }
            Value::Map(entries) => {
                let mut object = self.sink.new_object(None);
                for (key, entry) in entries {
                    if let Some(node) = self.write_value(entry, visited) {
                        self.sink.put(&mut object, key, node);
                    }
                }
                Some(self.sink.finish_object(object))
            }
        }
    }
}
