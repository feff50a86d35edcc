//! Reference pointers and their resolution against component buckets.
//!
//! A reference is either a bare component name, which is rewritten to the
//! canonical local pointer for the owning kind's bucket, or a fully
//! qualified pointer/URL, which is left untouched.

use crate::registry::ModelType;

use super::{ModelNode, Value};

/// The canonical, reference-resolvable component collections.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComponentBucket {
    /// `#/components/schemas`
    Schemas,
    /// `#/components/responses`
    Responses,
    /// `#/components/parameters`
    Parameters,
    /// `#/components/examples`
    Examples,
    /// `#/components/requestBodies`
    RequestBodies,
    /// `#/components/headers`
    Headers,
    /// `#/components/securitySchemes`
    SecuritySchemes,
    /// `#/components/links`
    Links,
    /// `#/components/callbacks`
    Callbacks,
    /// `#/components/pathItems`
    PathItems,
}

impl ComponentBucket {
    /// All buckets, in the order they appear in a components object.
    pub const ALL: &'static [Self] = &[
        Self::Schemas,
        Self::Responses,
        Self::Parameters,
        Self::Examples,
        Self::RequestBodies,
        Self::Headers,
        Self::SecuritySchemes,
        Self::Links,
        Self::Callbacks,
        Self::PathItems,
    ];

    /// The bucket's wire name inside the components object.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Schemas => "schemas",
            Self::Responses => "responses",
            Self::Parameters => "parameters",
            Self::Examples => "examples",
            Self::RequestBodies => "requestBodies",
            Self::Headers => "headers",
            Self::SecuritySchemes => "securitySchemes",
            Self::Links => "links",
            Self::Callbacks => "callbacks",
            Self::PathItems => "pathItems",
        }
    }

    /// Look a bucket up by its wire name.
    #[must_use]
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.wire_name() == name)
    }

    /// The canonical pointer prefix for this bucket.
    #[must_use]
    pub fn reference_prefix(self) -> String {
        format!("#/components/{}", self.wire_name())
    }

    /// The canonical pointer for the named component in this bucket.
    #[must_use]
    pub fn reference_of(self, name: &str) -> String {
        format!("{}/{name}", self.reference_prefix())
    }

    /// Normalize a raw reference value: bare component names are expanded
    /// to the canonical pointer, anything already qualified (containing a
    /// separator or scheme) is returned unchanged.
    #[must_use]
    pub fn parse_ref_value(self, raw: &str) -> String {
        if is_component_key(raw) {
            self.reference_of(raw)
        } else {
            raw.to_owned()
        }
    }
}

/// Whether `value` is a bare component key: non-empty, ASCII alphanumerics
/// plus `.`, `-` and `_` only.
#[must_use]
pub fn is_component_key(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Normalize a raw reference for the given model kind, per the kind's
/// component bucket. Kinds without a bucket leave the value unchanged.
#[must_use]
pub fn normalize_reference(raw: &str, kind: ModelType) -> String {
    match crate::registry::registry().describe(kind).bucket() {
        Some(bucket) => bucket.parse_ref_value(raw),
        None => raw.to_owned(),
    }
}

/// Resolve a same-document pointer against `document`, walking component
/// buckets and nested values.
///
/// Returns `None` when any path segment is missing. A dangling reference is
/// a normal outcome at this level, never an error: the missing component may
/// be supplied by a later, higher-precedence source.
#[must_use]
pub fn resolve(document: &ModelNode, pointer: &str) -> Option<ModelNode> {
    let path = pointer.strip_prefix("#/")?;
    let mut current = Value::Model(document.clone());
    for segment in path.split('/') {
        current = step(&current, &unescape(segment))?;
    }
    match current {
        Value::Model(node) => Some(node),
        _ => None,
    }
}

fn step(current: &Value, key: &str) -> Option<Value> {
    match current {
        Value::Model(node) => node.get(key).ok().flatten(),
        Value::Map(entries) => entries.get(key).cloned(),
        Value::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
        Value::Scalar(_) => None,
    }
}

fn unescape(segment: &str) -> String {
    // JSON pointer escaping: ~1 is '/', ~0 is '~'. Order matters.
    segment.replace("~1", "/").replace("~0", "~")
}
