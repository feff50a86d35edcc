//! The runtime document model.
//!
//! Every document entity is a [`ModelNode`]: a schema-described property bag
//! holding an ordered map from wire name to [`Value`]. Nodes are shared,
//! single-threaded handles (`Rc<RefCell<_>>`), mirroring the mutable object
//! graph the merge engine and the type-observer machinery require; see
//! DESIGN.md for the concurrency trade-off.

use indexmap::IndexMap;

mod bag;
pub mod reference;
pub mod schema;

pub use bag::ModelNode;

/// One property value inside a [`ModelNode`].
#[derive(Clone, Debug)]
pub enum Value {
    /// A scalar (string, number, boolean) or a verbatim JSON subtree for
    /// free-form properties and vendor extensions.
    Scalar(serde_json::Value),
    /// A nested model. Cloning is shallow: both values share the node.
    Model(ModelNode),
    /// An ordered list of values.
    List(Vec<Value>),
    /// An ordered map from string keys to values.
    Map(IndexMap<String, Value>),
}

impl Value {
    /// The string payload, when this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload, when this is a boolean scalar.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(serde_json::Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// The nested model, when this is a model value.
    #[must_use]
    pub fn as_model(&self) -> Option<&ModelNode> {
        match self {
            Self::Model(node) => Some(node),
            _ => None,
        }
    }

    /// The element list, when this is a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The entry map, when this is a map value.
    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Deep-copy the value; nested models are copied rather than shared,
    /// and subtrees shared within the value stay shared within the copy.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        bag::copy_value(self, &mut std::collections::HashMap::new())
    }

    pub(crate) fn content_eq(&self, other: &Self, visited: &mut Vec<(usize, usize)>) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Model(a), Self::Model(b)) => bag::nodes_eq(a, b, visited),
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| x.content_eq(y, visited))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, x)| {
                        b.get(key).is_some_and(|y| x.content_eq(y, visited))
                    })
            }
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.content_eq(other, &mut Vec::new())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(serde_json::Value::String(value.to_owned()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(serde_json::Value::String(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Scalar(serde_json::Value::Bool(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Scalar(serde_json::Value::Number(value.into()))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Scalar(value)
    }
}

impl From<ModelNode> for Value {
    fn from(value: ModelNode) -> Self {
        Self::Model(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Self::Map(value)
    }
}
