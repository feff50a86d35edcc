//! The generic, backend-agnostic model reader.

use std::sync::Arc;

use serde_json::Value as Json;
use tracing::debug;

use crate::error::{OasError, OasResult};
use crate::model::{ModelNode, Value};
use crate::registry::{
    ElementType, KindRecord, ModelType, PropertyDescriptor, PropertyShape, registry,
};
use crate::tree::{DocumentTree, TreeSource};

/// What to do with a source key that matches neither a declared property nor
/// the vendor-extension convention.
///
/// Dropping unknown input is the forward-compatible default: documents
/// written against a newer specification still read. Strict validation is
/// available for deployments that want it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UnknownKeyPolicy {
    /// Drop the key, logging at debug level.
    #[default]
    Ignore,
    /// Fail the read with [`OasError::UnknownProperty`].
    Error,
}

/// Options controlling a [`Reader`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ReaderOptions {
    /// Policy for unrecognized source keys.
    pub unknown_keys: UnknownKeyPolicy,
}

/// Populates model nodes from a backend tree.
///
/// One algorithm serves both backends: the document tree for textual
/// sources and the metadata tree for declaration-derived sources.
pub struct Reader<'t, S> {
    source: &'t S,
    options: ReaderOptions,
}

/// Reference objects may carry these sibling keys alongside the pointer.
const REFERENCE_OVERRIDES: [&str; 2] = ["description", "summary"];

impl<'t, S: TreeSource> Reader<'t, S> {
    /// Create a reader with default options.
    pub fn new(source: &'t S) -> Self {
        Self {
            source,
            options: ReaderOptions::default(),
        }
    }

    /// Create a reader with explicit options.
    pub fn with_options(source: &'t S, options: ReaderOptions) -> Self {
        Self { source, options }
    }

    /// Populate a model node of the given kind from `node`.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::IncompleteKind`] for abstract kinds,
    /// [`OasError::Shape`] when the node is not object-shaped (or, for
    /// Schema, a boolean), and [`OasError::UnknownProperty`] under
    /// [`UnknownKeyPolicy::Error`].
    pub fn read(&self, node: &S::Node, kind: ModelType) -> OasResult<ModelNode> {
        let record = registry().describe(kind);
        if record.is_incomplete() {
            return Err(Arc::new(OasError::IncompleteKind(kind.name())));
        }
        self.read_kind(node, record)
    }

    fn read_kind(&self, node: &S::Node, record: &'static KindRecord) -> OasResult<ModelNode> {
        if record.model_type() == ModelType::Schema && self.source.is_scalar(node) {
            if let Some(boolean) = self.source.scalar(node).as_ref().and_then(Json::as_bool) {
                return Ok(ModelNode::boolean_schema(boolean));
            }
        }
        if !self.source.is_object(node) {
            return Err(Arc::new(OasError::shape(
                record.name(),
                "(node)",
                "an object-shaped node",
            )));
        }

        let entries = self.source.entries(node);

        if record.bucket().is_some() {
            if let Some(raw) = self.reference_value(&entries) {
                return self.read_reference(record, &raw, &entries);
            }
        }

        let model = ModelNode::new_unchecked(record.model_type());
        let mut pending_nullable: Option<bool> = None;

        for (key, value) in entries {
            // The legacy nullable flag routes through the compatibility
            // layer, after every other key has been applied.
            if record.model_type() == ModelType::Schema && key == "nullable" {
                pending_nullable = self
                    .source
                    .scalar(value)
                    .as_ref()
                    .and_then(DocumentTree::coerce_boolean);
                continue;
            }

            if let Some(descriptor) = record.property(key) {
                self.apply_declared(&model, record, descriptor, value)?;
            } else if key.starts_with("x-") && record.is_extensible() {
                model.add_extension(key, self.source.to_raw(value))?;
            } else if let Some(descriptor) = record.unwrapped_property() {
                match self.convert_element(value, descriptor.element())? {
                    Some(converted) => {
                        model.put_entry(descriptor.wire_name(), key, converted)?;
                    }
                    None => self.unknown_key(record, key)?,
                }
            } else if record.is_dynamic() {
                model.set(key, Some(Value::Scalar(self.source.to_raw(value))))?;
            } else {
                self.unknown_key(record, key)?;
            }
        }

        if pending_nullable.is_some() {
            model.set_nullable(pending_nullable);
        }

        Ok(model)
    }

    fn reference_value(&self, entries: &[(&str, &S::Node)]) -> Option<String> {
        let reference_key = self.source.reference_key();
        entries
            .iter()
            .find(|(key, _)| *key == reference_key)
            .and_then(|(_, value)| self.source.scalar(value))
            .and_then(|raw| raw.as_str().map(ToOwned::to_owned))
            .filter(|raw| !raw.is_empty())
    }

    /// A bag read from a reference node carries only the pointer and the
    /// permitted override keys; everything else in the source is dropped. A
    /// higher-precedence source may still supply the inline definition
    /// later, via the merge engine.
    fn read_reference(
        &self,
        record: &'static KindRecord,
        raw: &str,
        entries: &[(&str, &S::Node)],
    ) -> OasResult<ModelNode> {
        let model = ModelNode::new_unchecked(record.model_type());
        model.set_reference(Some(raw))?;
        for key in REFERENCE_OVERRIDES {
            if record.property(key).is_none() {
                continue;
            }
            let text = entries
                .iter()
                .find(|(entry_key, _)| *entry_key == key)
                .and_then(|(_, value)| self.source.scalar(value))
                .as_ref()
                .and_then(DocumentTree::coerce_string);
            if let Some(text) = text {
                model.set(key, Some(Value::from(text)))?;
            }
        }
        Ok(model)
    }

    fn apply_declared(
        &self,
        model: &ModelNode,
        record: &'static KindRecord,
        descriptor: &'static PropertyDescriptor,
        value: &S::Node,
    ) -> OasResult<()> {
        match descriptor.shape() {
            PropertyShape::Single => {
                match self.convert_element(value, descriptor.element())? {
                    Some(converted) => model.set(descriptor.wire_name(), Some(converted))?,
                    None => debug!(
                        kind = record.name(),
                        property = descriptor.wire_name(),
                        "dropping non-coercible scalar"
                    ),
                }
            }
            PropertyShape::List => {
                // A non-array node is a single occurrence: either a scalar
                // where the wire allows both spellings (e.g. a lone type
                // tag), or a repeatable metadata sibling. Repeated keys
                // accumulate.
                let items: Vec<&S::Node> = if self.source.is_array(value) {
                    self.source.elements(value)
                } else {
                    vec![value]
                };
                let mut converted = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(element) = self.convert_element(item, descriptor.element())? {
                        converted.push(element);
                    }
                }
                let existing = model.get(descriptor.wire_name())?;
                if existing.is_some() {
                    for element in converted {
                        model.push_value(descriptor.wire_name(), element)?;
                    }
                } else {
                    model.set(descriptor.wire_name(), Some(Value::List(converted)))?;
                }
            }
            PropertyShape::Map => {
                if !self.source.is_object(value) {
                    debug!(
                        kind = record.name(),
                        property = descriptor.wire_name(),
                        "dropping non-object map value"
                    );
                    return Ok(());
                }
                let entries = self.source.entries(value);
                if entries.is_empty() && !descriptor.is_unwrapped() {
                    if model.get(descriptor.wire_name())?.is_none() {
                        model.set(
                            descriptor.wire_name(),
                            Some(Value::Map(indexmap::IndexMap::new())),
                        )?;
                    }
                    return Ok(());
                }
                for (key, entry) in entries {
                    match self.convert_element(entry, descriptor.element())? {
                        Some(converted) => {
                            model.put_entry(descriptor.wire_name(), key, converted)?;
                        }
                        None => debug!(
                            kind = record.name(),
                            property = descriptor.wire_name(),
                            key,
                            "dropping non-coercible map entry"
                        ),
                    }
                }
            }
        }
        Ok(())
    }

    fn convert_element(
        &self,
        node: &S::Node,
        element: ElementType,
    ) -> OasResult<Option<Value>> {
        let converted = match element {
            ElementType::Model(kind) => {
                let declared = registry().describe(kind);
                // A metadata instance may name a more specific kind; fall
                // back to the declared element kind otherwise.
                let record = self
                    .source
                    .instance_kind(node)
                    .and_then(|name| registry().describe_name(name))
                    .filter(|r| !r.is_incomplete())
                    .unwrap_or(declared);
                let boolean_schema = record.model_type() == ModelType::Schema
                    && self
                        .source
                        .scalar(node)
                        .as_ref()
                        .and_then(Json::as_bool)
                        .is_some();
                let readable = self.source.is_object(node) || boolean_schema;
                if readable {
                    Some(Value::Model(self.read_kind(node, record)?))
                } else {
                    None
                }
            }
            ElementType::String => self
                .source
                .scalar(node)
                .as_ref()
                .and_then(DocumentTree::coerce_string)
                .map(Value::from),
            ElementType::Boolean => self
                .source
                .scalar(node)
                .as_ref()
                .and_then(DocumentTree::coerce_boolean)
                .map(Value::from),
            ElementType::Number => self
                .source
                .scalar(node)
                .as_ref()
                .and_then(DocumentTree::coerce_number)
                .map(|n| Value::Scalar(Json::Number(n))),
            ElementType::Integer => self
                .source
                .scalar(node)
                .as_ref()
                .and_then(DocumentTree::coerce_number)
                .filter(|n| n.is_i64() || n.is_u64())
                .map(|n| Value::Scalar(Json::Number(n))),
            ElementType::Any => Some(Value::Scalar(self.source.to_raw(node))),
        };
        Ok(converted)
    }

    fn unknown_key(&self, record: &'static KindRecord, key: &str) -> OasResult<()> {
        match self.options.unknown_keys {
            UnknownKeyPolicy::Ignore => {
                debug!(kind = record.name(), key, "ignoring unrecognized property");
                Ok(())
            }
            UnknownKeyPolicy::Error => Err(Arc::new(OasError::UnknownProperty {
                kind: record.name(),
                property: key.to_owned(),
            })),
        }
    }
}
