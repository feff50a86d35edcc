//! The property bag backing every document entity.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{OasError, OasResult};
use crate::registry::{
    ElementType, KindRecord, ModelType, PropertyDescriptor, PropertyShape, registry,
};

use super::Value;

pub(crate) struct ModelData {
    pub(crate) kind: ModelType,
    pub(crate) properties: IndexMap<String, Value>,
    pub(crate) extensions: IndexMap<String, serde_json::Value>,
    pub(crate) boolean: Option<bool>,
    pub(crate) nullable: Option<bool>,
    pub(crate) observers: Vec<ModelNode>,
    pub(crate) mod_count: u64,
}

/// A runtime instance of a model kind: an ordered property bag plus a
/// vendor-extension map and a modification counter.
///
/// `ModelNode` is a shared handle; cloning is cheap and both clones address
/// the same underlying bag. Nodes are not thread-safe and must only be
/// mutated from one thread (see the crate-level concurrency notes).
#[derive(Clone)]
pub struct ModelNode {
    inner: Rc<RefCell<ModelData>>,
}

fn err<T>(error: OasError) -> OasResult<T> {
    Err(Arc::new(error))
}

impl ModelNode {
    /// Create an empty bag of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::IncompleteKind`] when `kind` is abstract.
    pub fn new(kind: ModelType) -> OasResult<Self> {
        if registry().describe(kind).is_incomplete() {
            return err(OasError::IncompleteKind(kind.name()));
        }
        Ok(Self::new_unchecked(kind))
    }

    pub(crate) fn new_unchecked(kind: ModelType) -> Self {
        Self::from_data(ModelData {
            kind,
            properties: IndexMap::new(),
            extensions: IndexMap::new(),
            boolean: None,
            nullable: None,
            observers: Vec::new(),
            mod_count: 0,
        })
    }

    pub(crate) fn from_data(data: ModelData) -> Self {
        Self {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    /// Create a boolean-mode schema: the JSON Schema literal `true` or
    /// `false` rather than an object. Ordinary property access fails on
    /// such a node.
    #[must_use]
    pub fn boolean_schema(value: bool) -> Self {
        let node = Self::new_unchecked(ModelType::Schema);
        node.data_mut().boolean = Some(value);
        node
    }

    /// The model kind of this bag.
    #[must_use]
    pub fn kind(&self) -> ModelType {
        self.data().kind
    }

    /// The registry record describing this bag's kind.
    #[must_use]
    pub fn record(&self) -> &'static KindRecord {
        registry().describe(self.kind())
    }

    /// Whether this node is a boolean-mode schema.
    #[must_use]
    pub fn is_boolean_schema(&self) -> bool {
        self.data().boolean.is_some()
    }

    /// The boolean payload of a boolean-mode schema.
    #[must_use]
    pub fn boolean_value(&self) -> Option<bool> {
        self.data().boolean
    }

    /// The number of mutations applied to this bag. Monotonically
    /// non-decreasing; never reset.
    #[must_use]
    pub fn mod_count(&self) -> u64 {
        self.data().mod_count
    }

    /// Whether `self` and `other` are the same underlying bag.
    #[must_use]
    pub fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    pub(crate) fn data(&self) -> Ref<'_, ModelData> {
        self.inner.borrow()
    }

    pub(crate) fn data_mut(&self) -> RefMut<'_, ModelData> {
        self.inner.borrow_mut()
    }

    pub(crate) fn touch(&self) {
        self.data_mut().mod_count += 1;
    }

    fn guard_object(&self, operation: &str) -> OasResult<()> {
        if self.is_boolean_schema() {
            return err(OasError::unsupported(format!(
                "{operation} is unavailable on a boolean schema"
            )));
        }
        Ok(())
    }

    /// Read a property by wire name.
    ///
    /// Returns `None` when the property is unset. For an unwrapped property,
    /// the map view is synthesized from the bag's own key space.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::UnsupportedOperation`] on a boolean-mode schema.
    pub fn get(&self, wire_name: &str) -> OasResult<Option<Value>> {
        self.guard_object("property access")?;
        let record = self.record();

        if let Some(descriptor) = record.property(wire_name) {
            if descriptor.is_unwrapped() {
                return Ok(self.synthesize_unwrapped(descriptor));
            }
            return Ok(self.data().properties.get(wire_name).cloned());
        }

        if record.is_dynamic() {
            return Ok(self.data().properties.get(wire_name).cloned());
        }

        Ok(None)
    }

    /// Write (or with `None`, remove) a property by wire name.
    ///
    /// The value's shape is validated against the property descriptor. An
    /// unwrapped property's entries are written directly into the bag's own
    /// key space. On a dynamic kind, undeclared names are accepted verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::UnsupportedOperation`] on a boolean-mode schema,
    /// [`OasError::Shape`] when the value does not match the descriptor, and
    /// [`OasError::UnknownProperty`] for undeclared names on non-dynamic
    /// kinds.
    pub fn set(&self, wire_name: &str, value: Option<Value>) -> OasResult<()> {
        self.guard_object("property mutation")?;
        let record = self.record();

        if let Some(descriptor) = record.property(wire_name) {
            if descriptor.is_unwrapped() {
                return self.set_unwrapped(record, descriptor, value);
            }
            match value {
                Some(value) => {
                    validate_value(record.name(), descriptor, &value)?;
                    self.data_mut().properties.insert(wire_name.to_owned(), value);
                }
                None => {
                    self.data_mut().properties.shift_remove(wire_name);
                }
            }
            self.touch();
            return Ok(());
        }

        if record.is_dynamic() {
            match value {
                Some(value) => {
                    self.data_mut().properties.insert(wire_name.to_owned(), value);
                }
                None => {
                    self.data_mut().properties.shift_remove(wire_name);
                }
            }
            self.touch();
            return Ok(());
        }

        err(OasError::UnknownProperty {
            kind: record.name(),
            property: wire_name.to_owned(),
        })
    }

    fn synthesize_unwrapped(&self, descriptor: &PropertyDescriptor) -> Option<Value> {
        let record = self.record();
        let data = self.data();
        let mut view: IndexMap<String, Value> = IndexMap::new();
        for (key, value) in &data.properties {
            if record.property(key).is_some() {
                continue;
            }
            if matches_element(value, descriptor.element()) {
                view.insert(key.clone(), value.clone());
            }
        }
        if view.is_empty() {
            None
        } else {
            Some(Value::Map(view))
        }
    }

    fn set_unwrapped(
        &self,
        record: &KindRecord,
        descriptor: &PropertyDescriptor,
        value: Option<Value>,
    ) -> OasResult<()> {
        // Drop the entries currently occupying the unwrapped key space.
        let stale: Vec<String> = {
            let data = self.data();
            data.properties
                .iter()
                .filter(|(key, entry)| {
                    record.property(key.as_str()).is_none()
                        && matches_element(entry, descriptor.element())
                })
                .map(|(key, _)| key.clone())
                .collect()
        };
        {
            let mut data = self.data_mut();
            for key in stale {
                data.properties.shift_remove(&key);
            }
        }

        if let Some(value) = value {
            let Value::Map(entries) = value else {
                return err(OasError::shape(
                    record.name(),
                    descriptor.wire_name(),
                    expected_shape(descriptor),
                ));
            };
            for entry in entries.values() {
                if !matches_element(entry, descriptor.element()) {
                    return err(OasError::shape(
                        record.name(),
                        descriptor.wire_name(),
                        expected_shape(descriptor),
                    ));
                }
            }
            let mut data = self.data_mut();
            for (key, entry) in entries {
                data.properties.insert(key, entry);
            }
        }
        self.touch();
        Ok(())
    }

    /// Append one element to a list-shaped property, creating the list when
    /// absent. This is the repeatable operation named by the descriptor's
    /// singular name.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::Shape`] when the property is not list-shaped or
    /// the element does not match, and the usual boolean-mode error.
    pub fn push_value(&self, wire_name: &str, element: Value) -> OasResult<()> {
        self.guard_object("property mutation")?;
        let record = self.record();
        let Some(descriptor) = record.property(wire_name) else {
            return err(OasError::UnknownProperty {
                kind: record.name(),
                property: wire_name.to_owned(),
            });
        };
        if descriptor.shape() != PropertyShape::List
            || !matches_element(&element, descriptor.element())
        {
            return err(OasError::shape(
                record.name(),
                wire_name,
                expected_shape(descriptor),
            ));
        }

        let mut data = self.data_mut();
        match data.properties.get_mut(wire_name) {
            Some(Value::List(items)) => items.push(element),
            _ => {
                data.properties
                    .insert(wire_name.to_owned(), Value::List(vec![element]));
            }
        }
        data.mod_count += 1;
        Ok(())
    }

    /// Remove the first element equal to `element` from a list-shaped
    /// property.
    ///
    /// # Errors
    ///
    /// Returns the boolean-mode error; removal from an unset property is a
    /// no-op that still counts as a mutation.
    pub fn remove_value(&self, wire_name: &str, element: &Value) -> OasResult<()> {
        self.guard_object("property mutation")?;
        let mut data = self.data_mut();
        if let Some(Value::List(items)) = data.properties.get_mut(wire_name) {
            if let Some(index) = items.iter().position(|existing| existing == element) {
                items.remove(index);
            }
        }
        data.mod_count += 1;
        Ok(())
    }

    /// Insert one entry into a map-shaped property, creating the map when
    /// absent. For an unwrapped property the entry is written directly into
    /// the bag's own key space.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::Shape`] when the property is not map-shaped or
    /// the entry does not match, and the usual boolean-mode error.
    pub fn put_entry(&self, wire_name: &str, key: &str, entry: Value) -> OasResult<()> {
        self.guard_object("property mutation")?;
        let record = self.record();
        let Some(descriptor) = record.property(wire_name) else {
            return err(OasError::UnknownProperty {
                kind: record.name(),
                property: wire_name.to_owned(),
            });
        };
        if descriptor.shape() != PropertyShape::Map
            || !matches_element(&entry, descriptor.element())
        {
            return err(OasError::shape(
                record.name(),
                wire_name,
                expected_shape(descriptor),
            ));
        }

        let mut data = self.data_mut();
        if descriptor.is_unwrapped() {
            data.properties.insert(key.to_owned(), entry);
        } else {
            match data.properties.get_mut(wire_name) {
                Some(Value::Map(entries)) => {
                    entries.insert(key.to_owned(), entry);
                }
                _ => {
                    let mut entries = IndexMap::new();
                    entries.insert(key.to_owned(), entry);
                    data.properties
                        .insert(wire_name.to_owned(), Value::Map(entries));
                }
            }
        }
        data.mod_count += 1;
        Ok(())
    }

    /// Remove one entry from a map-shaped property.
    ///
    /// # Errors
    ///
    /// Returns the boolean-mode error; removal of a missing entry is a
    /// no-op that still counts as a mutation.
    pub fn remove_entry(&self, wire_name: &str, key: &str) -> OasResult<()> {
        self.guard_object("property mutation")?;
        let unwrapped = self
            .record()
            .property(wire_name)
            .is_some_and(PropertyDescriptor::is_unwrapped);
        let mut data = self.data_mut();
        if unwrapped {
            data.properties.shift_remove(key);
        } else if let Some(Value::Map(entries)) = data.properties.get_mut(wire_name) {
            entries.shift_remove(key);
        }
        data.mod_count += 1;
        Ok(())
    }

    /// Add a vendor extension. Extension names must carry the `x-` prefix
    /// and the kind must be extensible; values are preserved verbatim and
    /// never interpreted.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::UnsupportedOperation`] on boolean-mode schemas
    /// and non-extensible kinds, [`OasError::Shape`] for names without the
    /// vendor prefix.
    pub fn add_extension(&self, name: &str, value: serde_json::Value) -> OasResult<()> {
        self.guard_object("extension mutation")?;
        let record = self.record();
        if !record.is_extensible() {
            return err(OasError::unsupported(format!(
                "{} does not accept vendor extensions",
                record.name()
            )));
        }
        if !name.starts_with("x-") {
            return err(OasError::shape(
                record.name(),
                name,
                "a vendor extension name beginning with 'x-'",
            ));
        }
        let mut data = self.data_mut();
        data.extensions.insert(name.to_owned(), value);
        data.mod_count += 1;
        Ok(())
    }

    /// Remove a vendor extension. Removing a missing name is a no-op that
    /// still counts as a mutation.
    pub fn remove_extension(&self, name: &str) {
        let mut data = self.data_mut();
        data.extensions.shift_remove(name);
        data.mod_count += 1;
    }

    /// One vendor extension's value, verbatim.
    #[must_use]
    pub fn extension(&self, name: &str) -> Option<serde_json::Value> {
        self.data().extensions.get(name).cloned()
    }

    /// All vendor extensions in document order.
    #[must_use]
    pub fn extensions(&self) -> IndexMap<String, serde_json::Value> {
        self.data().extensions.clone()
    }

    /// A read-only snapshot of the raw key space, excluding extensions.
    ///
    /// This is the generic escape hatch for dynamic constructs; unwrapped
    /// entries appear under their own keys, exactly as stored.
    #[must_use]
    pub fn all_properties(&self) -> IndexMap<String, Value> {
        self.data().properties.clone()
    }

    /// Replace the raw key space wholesale, without per-descriptor shape
    /// validation. The generic counterpart of [`ModelNode::all_properties`].
    ///
    /// # Errors
    ///
    /// Returns the boolean-mode error.
    pub fn set_all_properties(&self, properties: IndexMap<String, Value>) -> OasResult<()> {
        self.guard_object("property mutation")?;
        let mut data = self.data_mut();
        data.properties = properties;
        data.mod_count += 1;
        Ok(())
    }

    /// A lenient string read: `None` when unset, not a string, or the node
    /// is a boolean-mode schema.
    #[must_use]
    pub fn string_property(&self, wire_name: &str) -> Option<String> {
        self.get(wire_name)
            .ok()
            .flatten()
            .and_then(|v| v.as_str().map(ToOwned::to_owned))
    }

    /// A lenient boolean read, in the manner of
    /// [`ModelNode::string_property`].
    #[must_use]
    pub fn bool_property(&self, wire_name: &str) -> Option<bool> {
        self.get(wire_name).ok().flatten().and_then(|v| v.as_bool())
    }

    /// The normalized reference pointer, when this bag is a reference.
    #[must_use]
    pub fn reference(&self) -> Option<String> {
        self.string_property("$ref")
    }

    /// Whether this bag carries a reference pointer instead of an inline
    /// definition.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.reference().is_some()
    }

    /// Set (or with `None`, clear) the reference pointer. A bare component
    /// name is expanded to the canonical pointer for this kind's bucket.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::UnknownProperty`] when the kind is not
    /// reference-capable.
    pub fn set_reference(&self, reference: Option<&str>) -> OasResult<()> {
        let normalized = reference.map(|raw| match self.record().bucket() {
            Some(bucket) => bucket.parse_ref_value(raw),
            None => raw.to_owned(),
        });
        self.set("$ref", normalized.map(Value::from))
    }

    /// The common `description` property.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.string_property("description")
    }

    /// Set the common `description` property.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`ModelNode::set`].
    pub fn set_description(&self, description: Option<&str>) -> OasResult<()> {
        self.set("description", description.map(Value::from))
    }

    /// The common `summary` property.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        self.string_property("summary")
    }

    /// The common `name` property.
    #[must_use]
    pub fn name_property(&self) -> Option<String> {
        self.string_property("name")
    }

    /// The common `externalDocs` property.
    #[must_use]
    pub fn external_docs(&self) -> Option<Self> {
        self.get("externalDocs")
            .ok()
            .flatten()
            .and_then(|v| v.as_model().cloned())
    }

    /// Deep-copy this bag. Nested models are copied recursively; shared
    /// subtrees stay shared within the copy, and cycles are preserved.
    /// Observer registrations are not carried over.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        self.copy_with(&mut HashMap::new())
    }

    pub(crate) fn copy_with(&self, visited: &mut HashMap<usize, Self>) -> Self {
        if let Some(existing) = visited.get(&self.ptr_id()) {
            return existing.clone();
        }
        let copy = {
            let data = self.data();
            Self::from_data(ModelData {
                kind: data.kind,
                properties: IndexMap::new(),
                extensions: data.extensions.clone(),
                boolean: data.boolean,
                nullable: data.nullable,
                observers: Vec::new(),
                mod_count: 0,
            })
        };
        visited.insert(self.ptr_id(), copy.clone());

        let entries: Vec<(String, Value)> = self
            .data()
            .properties
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (key, value) in entries {
            let copied = copy_value(&value, visited);
            copy.data_mut().properties.insert(key, copied);
        }
        copy
    }
}

pub(crate) fn copy_value(value: &Value, visited: &mut HashMap<usize, ModelNode>) -> Value {
    match value {
        Value::Scalar(raw) => Value::Scalar(raw.clone()),
        Value::Model(node) => Value::Model(node.copy_with(visited)),
        Value::List(items) => Value::List(items.iter().map(|v| copy_value(v, visited)).collect()),
        Value::Map(entries) => Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), copy_value(v, visited)))
                .collect(),
        ),
    }
}

pub(crate) fn nodes_eq(a: &ModelNode, b: &ModelNode, visited: &mut Vec<(usize, usize)>) -> bool {
    if a.same_node(b) {
        return true;
    }
    let pair = (a.ptr_id(), b.ptr_id());
    if visited.contains(&pair) {
        // Already being compared further up the stack; treat as equal to
        // break the cycle.
        return true;
    }
    visited.push(pair);

    let result = {
        let da = a.data();
        let db = b.data();
        da.kind == db.kind
            && da.boolean == db.boolean
            && da.extensions == db.extensions
            && da.properties.len() == db.properties.len()
            && da.properties.iter().all(|(key, value)| {
                db.properties
                    .get(key)
                    .is_some_and(|other| value.content_eq(other, visited))
            })
    };

    visited.pop();
    result
}

impl PartialEq for ModelNode {
    /// Deep content equality over kind, boolean mode, properties and
    /// extensions. The observer list and the private nullable flag are not
    /// document content and do not participate.
    fn eq(&self, other: &Self) -> bool {
        nodes_eq(self, other, &mut Vec::new())
    }
}

impl fmt::Display for ModelNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(boolean) = self.boolean_value() {
            return write!(f, "{boolean}");
        }
        let data = self.data();
        let keys: Vec<&str> = data.properties.keys().map(String::as_str).collect();
        write!(f, "{}{{{}}}", self.kind().name(), keys.join(", "))
    }
}

impl fmt::Debug for ModelNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data();
        f.debug_struct("ModelNode")
            .field("kind", &data.kind)
            .field("boolean", &data.boolean)
            .field("keys", &data.properties.keys().collect::<Vec<_>>())
            .field("extensions", &data.extensions.keys().collect::<Vec<_>>())
            .field("mod_count", &data.mod_count)
            .finish()
    }
}

pub(crate) fn matches_element(value: &Value, element: ElementType) -> bool {
    match element {
        ElementType::String => matches!(value, Value::Scalar(serde_json::Value::String(_))),
        ElementType::Boolean => matches!(value, Value::Scalar(serde_json::Value::Bool(_))),
        ElementType::Number => matches!(value, Value::Scalar(serde_json::Value::Number(_))),
        ElementType::Integer => match value {
            Value::Scalar(serde_json::Value::Number(n)) => n.is_i64() || n.is_u64(),
            _ => false,
        },
        ElementType::Any => matches!(value, Value::Scalar(_)),
        ElementType::Model(kind) => value.as_model().is_some_and(|node| node.kind() == kind),
    }
}

fn validate_value(
    kind: &'static str,
    descriptor: &PropertyDescriptor,
    value: &Value,
) -> OasResult<()> {
    let valid = match descriptor.shape() {
        PropertyShape::Single => matches_element(value, descriptor.element()),
        PropertyShape::List => value
            .as_list()
            .is_some_and(|items| items.iter().all(|v| matches_element(v, descriptor.element()))),
        PropertyShape::Map => value.as_map().is_some_and(|entries| {
            entries
                .values()
                .all(|v| matches_element(v, descriptor.element()))
        }),
    };
    if valid {
        Ok(())
    } else {
        err(OasError::shape(
            kind,
            descriptor.wire_name(),
            expected_shape(descriptor),
        ))
    }
}

fn expected_shape(descriptor: &PropertyDescriptor) -> &'static str {
    match descriptor.shape() {
        PropertyShape::List => "a list of the declared element type",
        PropertyShape::Map => "a map of the declared element type",
        PropertyShape::Single => match descriptor.element() {
            ElementType::String => "a string value",
            ElementType::Boolean => "a boolean value",
            ElementType::Number => "a numeric value",
            ElementType::Integer => "an integer value",
            ElementType::Any => "a verbatim scalar value",
            ElementType::Model(_) => "a nested model of the declared kind",
        },
    }
}
