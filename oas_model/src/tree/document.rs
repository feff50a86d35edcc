//! Document-tree backend over `serde_json` values.
//!
//! JSON and YAML sources both parse into [`serde_json::Value`] (see
//! [`crate::io::source`]), so one adapter serves both textual formats.

use serde_json::{Map, Value};

use super::{TreeSink, TreeSource};

/// Adapter implementing the tree contract for `serde_json::Value` trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentTree;

impl DocumentTree {
    /// Coerce a scalar to a string the way lenient JSON readers do: numbers
    /// and booleans are rendered, everything else is rejected.
    #[must_use]
    pub fn coerce_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Coerce a scalar to a boolean. Accepts the literal strings `true` and
    /// `false` in addition to JSON booleans.
    #[must_use]
    pub fn coerce_boolean(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s == "true" => Some(true),
            Value::String(s) if s == "false" => Some(false),
            _ => None,
        }
    }

    /// Coerce a scalar to a number, preserving the original representation.
    #[must_use]
    pub fn coerce_number(value: &Value) -> Option<serde_json::Number> {
        match value {
            Value::Number(n) => Some(n.clone()),
            _ => None,
        }
    }
}

impl TreeSource for DocumentTree {
    type Node = Value;

    fn is_scalar(&self, node: &Value) -> bool {
        !node.is_object() && !node.is_array()
    }

    fn is_array(&self, node: &Value) -> bool {
        node.is_array()
    }

    fn is_object(&self, node: &Value) -> bool {
        node.is_object()
    }

    fn scalar(&self, node: &Value) -> Option<Value> {
        self.is_scalar(node).then(|| node.clone())
    }

    fn elements<'a>(&self, node: &'a Value) -> Vec<&'a Value> {
        node.as_array().map(|a| a.iter().collect()).unwrap_or_default()
    }

    fn entries<'a>(&self, node: &'a Value) -> Vec<(&'a str, &'a Value)> {
        node.as_object()
            .map(|o| o.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default()
    }

    fn to_raw(&self, node: &Value) -> Value {
        node.clone()
    }
}

impl TreeSink for DocumentTree {
    type Node = Value;
    type ArrayBuilder = Vec<Value>;
    type ObjectBuilder = Map<String, Value>;

    fn raw(&self, value: Value) -> Value {
        value
    }

    fn new_array(&self) -> Vec<Value> {
        Vec::new()
    }

    fn push(&self, array: &mut Vec<Value>, node: Value) {
        array.push(node);
    }

    fn finish_array(&self, array: Vec<Value>) -> Value {
        Value::Array(array)
    }

    fn new_object(&self, _kind: Option<&str>) -> Map<String, Value> {
        Map::new()
    }

    fn put(&self, object: &mut Map<String, Value>, key: &str, node: Value) {
        object.insert(key.to_owned(), node);
    }

    fn finish_object(&self, object: Map<String, Value>) -> Value {
        Value::Object(object)
    }
}
