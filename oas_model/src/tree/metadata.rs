//! Metadata-tree backend for declaration-derived input.
//!
//! Declaration scanners hand the reader a tree of *nested instances*:
//! annotation-like constructs carrying a kind name and an ordered list of
//! named fields. Field names may repeat; the reader collapses repeated
//! siblings into list properties.

use serde_json::Value;

use super::{TreeSink, TreeSource};

/// A single node in a metadata tree.
#[derive(Clone, Debug, PartialEq)]
pub enum MetaValue {
    /// A scalar value (string, number or boolean).
    Scalar(Value),
    /// An ordered array of values.
    Array(Vec<MetaValue>),
    /// A nested instance: the metadata tree's notion of a keyed object.
    Instance(MetaInstance),
}

impl MetaValue {
    /// Convenience constructor for a string scalar.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Value::String(value.into()))
    }

    /// Convenience constructor for a boolean scalar.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::Scalar(Value::Bool(value))
    }
}

impl From<MetaInstance> for MetaValue {
    fn from(instance: MetaInstance) -> Self {
        Self::Instance(instance)
    }
}

/// An annotation-like construct: a kind name plus ordered, repeatable
/// named fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetaInstance {
    kind: String,
    fields: Vec<(String, MetaValue)>,
}

impl MetaInstance {
    /// Create an empty instance of the named kind.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Vec::new(),
        }
    }

    /// Append a named field, builder style. Repeating a name is allowed and
    /// represents repeatable sibling instances.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// The kind name this instance carries.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The ordered field list.
    #[must_use]
    pub fn fields(&self) -> &[(String, MetaValue)] {
        &self.fields
    }
}

/// Adapter implementing the tree contract for [`MetaValue`] trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetadataTree;

impl TreeSource for MetadataTree {
    type Node = MetaValue;

    fn is_scalar(&self, node: &MetaValue) -> bool {
        matches!(node, MetaValue::Scalar(_))
    }

    fn is_array(&self, node: &MetaValue) -> bool {
        matches!(node, MetaValue::Array(_))
    }

    fn is_object(&self, node: &MetaValue) -> bool {
        matches!(node, MetaValue::Instance(_))
    }

    fn scalar(&self, node: &MetaValue) -> Option<Value> {
        match node {
            MetaValue::Scalar(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn elements<'a>(&self, node: &'a MetaValue) -> Vec<&'a MetaValue> {
        match node {
            MetaValue::Array(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn entries<'a>(&self, node: &'a MetaValue) -> Vec<(&'a str, &'a MetaValue)> {
        match node {
            MetaValue::Instance(instance) => instance
                .fields
                .iter()
                .map(|(name, value)| (name.as_str(), value))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn instance_kind<'a>(&self, node: &'a MetaValue) -> Option<&'a str> {
        match node {
            MetaValue::Instance(instance) => Some(instance.kind()),
            _ => None,
        }
    }

    fn reference_key(&self) -> &'static str {
        // Annotations spell references as a plain `ref` field.
        "ref"
    }

    fn to_raw(&self, node: &MetaValue) -> Value {
        match node {
            MetaValue::Scalar(value) => value.clone(),
            MetaValue::Array(items) => {
                Value::Array(items.iter().map(|item| self.to_raw(item)).collect())
            }
            MetaValue::Instance(instance) => {
                let mut object = serde_json::Map::new();
                for (name, value) in &instance.fields {
                    // Later duplicates win; raw materialization is only used
                    // for uninterpreted payloads.
                    object.insert(name.clone(), self.to_raw(value));
                }
                Value::Object(object)
            }
        }
    }
}

impl TreeSink for MetadataTree {
    type Node = MetaValue;
    type ArrayBuilder = Vec<MetaValue>;
    type ObjectBuilder = MetaInstance;

    fn raw(&self, value: Value) -> MetaValue {
        MetaValue::Scalar(value)
    }

    fn new_array(&self) -> Vec<MetaValue> {
        Vec::new()
    }

    fn push(&self, array: &mut Vec<MetaValue>, node: MetaValue) {
        array.push(node);
    }

    fn finish_array(&self, array: Vec<MetaValue>) -> MetaValue {
        MetaValue::Array(array)
    }

    fn new_object(&self, kind: Option<&str>) -> MetaInstance {
        MetaInstance::new(kind.unwrap_or_default())
    }

    fn put(&self, object: &mut MetaInstance, key: &str, node: MetaValue) {
        object.fields.push((key.to_owned(), node));
    }

    fn finish_object(&self, object: MetaInstance) -> MetaValue {
        MetaValue::Instance(object)
    }
}
