//! Backend-neutral tree abstraction.
//!
//! The generic reader and writer are written once against the two traits in
//! this module and run unmodified over either backend: the document tree
//! (JSON/YAML, [`DocumentTree`]) or the metadata tree (declarative
//! annotation-like instances, [`MetadataTree`]). Only the adapters differ.

mod document;
mod metadata;
#[cfg(test)]
mod tests;

pub use document::DocumentTree;
pub use metadata::{MetaInstance, MetaValue, MetadataTree};

/// Read-side capabilities of a tree backend.
///
/// A node is exactly one of scalar, array or keyed object. Object entries are
/// returned in document order and, for backends that support it, may repeat a
/// key (the metadata tree's repeatable sibling instances).
pub trait TreeSource {
    /// The backend's node type.
    type Node;

    /// Whether `node` is a scalar value.
    fn is_scalar(&self, node: &Self::Node) -> bool;

    /// Whether `node` is an array.
    fn is_array(&self, node: &Self::Node) -> bool;

    /// Whether `node` is a keyed object.
    fn is_object(&self, node: &Self::Node) -> bool;

    /// The scalar payload of `node`, or `None` when `node` is not a scalar.
    fn scalar(&self, node: &Self::Node) -> Option<serde_json::Value>;

    /// The ordered elements of an array node. Empty when `node` is not an
    /// array.
    fn elements<'a>(&self, node: &'a Self::Node) -> Vec<&'a Self::Node>;

    /// The ordered `(key, value)` entries of an object node. Empty when
    /// `node` is not an object.
    fn entries<'a>(&self, node: &'a Self::Node) -> Vec<(&'a str, &'a Self::Node)>;

    /// The kind name carried by a nested-instance object, where the backend
    /// has such a notion. The document backend always returns `None`.
    fn instance_kind<'a>(&self, node: &'a Self::Node) -> Option<&'a str> {
        let _ = node;
        None
    }

    /// The key under which this backend spells a reference pointer.
    fn reference_key(&self) -> &'static str {
        "$ref"
    }

    /// Materialize `node` verbatim as a JSON value.
    ///
    /// Used for vendor extensions and open-schema keywords, which are
    /// preserved without interpretation.
    fn to_raw(&self, node: &Self::Node) -> serde_json::Value;
}

/// Write-side capabilities of a tree backend.
pub trait TreeSink {
    /// The backend's node type.
    type Node;
    /// Accumulator for an array under construction.
    type ArrayBuilder;
    /// Accumulator for a keyed object under construction.
    type ObjectBuilder;

    /// Wrap a raw JSON value as a node. Arbitrary JSON is accepted so that
    /// vendor extensions round-trip verbatim.
    fn raw(&self, value: serde_json::Value) -> Self::Node;

    /// Start a new array.
    fn new_array(&self) -> Self::ArrayBuilder;

    /// Append a node to an array under construction.
    fn push(&self, array: &mut Self::ArrayBuilder, node: Self::Node);

    /// Finish an array, producing an immutable node.
    fn finish_array(&self, array: Self::ArrayBuilder) -> Self::Node;

    /// Start a new object. `kind` names the model kind being written, for
    /// backends that label their objects; the document backend ignores it.
    fn new_object(&self, kind: Option<&str>) -> Self::ObjectBuilder;

    /// Set a key on an object under construction.
    fn put(&self, object: &mut Self::ObjectBuilder, key: &str, node: Self::Node);

    /// Finish an object, producing an immutable node.
    fn finish_object(&self, object: Self::ObjectBuilder) -> Self::Node;
}
