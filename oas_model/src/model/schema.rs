//! Schema type-list and nullability compatibility layer.
//!
//! Two historical representations of nullability coexist: the legacy
//! boolean `nullable` flag and the `null` member of the `type` list. The
//! operations here keep both views consistent so that the type and the
//! nullability of a schema can be set separately by different parts of the
//! assembly process, even though the information lives in one field.
//!
//! A schema may also have *type observers*: other schemas that mirror its
//! `type` list while retaining their own, independently-tracked `null`
//! membership. Propagation is synchronous, in registration order, and
//! cycle-safe.

use tracing::debug;

use crate::registry::ModelType;

use super::{ModelNode, Value};

/// The `null` type tag.
pub const NULL_TYPE: &str = "null";

/// A schema permitting only the `null` type.
#[must_use]
pub fn null_schema() -> ModelNode {
    let schema = ModelNode::new_unchecked(ModelType::Schema);
    raw_set_type_list(&schema, Some(vec![NULL_TYPE.to_owned()]));
    schema
}

fn is_schema_object(node: &ModelNode) -> bool {
    node.kind() == ModelType::Schema && !node.is_boolean_schema()
}

fn raw_type_list(node: &ModelNode) -> Option<Vec<String>> {
    let data = node.data();
    match data.properties.get("type") {
        Some(Value::List(items)) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(ToOwned::to_owned))
                .collect(),
        ),
        _ => None,
    }
}

fn raw_set_type_list(node: &ModelNode, types: Option<Vec<String>>) {
    let mut data = node.data_mut();
    match types {
        Some(types) => {
            let items = types.into_iter().map(Value::from).collect();
            data.properties.insert("type".to_owned(), Value::List(items));
        }
        None => {
            data.properties.shift_remove("type");
        }
    }
    data.mod_count += 1;
}

fn observers_of(node: &ModelNode) -> Vec<ModelNode> {
    node.data().observers.clone()
}

impl ModelNode {
    /// The schema's type list, or `None` when unset. `None` on non-schema
    /// kinds and boolean-mode schemas.
    #[must_use]
    pub fn type_list(&self) -> Option<Vec<String>> {
        if !is_schema_object(self) {
            return None;
        }
        raw_type_list(self)
    }

    /// Replace the type list outright.
    ///
    /// Nullability established through [`ModelNode::set_nullable`] survives
    /// the replacement: a true flag re-appends the `null` tag to the new
    /// list, after which the list owns nullability and the flag is cleared.
    /// A `null` member that was only ever part of a previous list does not
    /// carry over. Observers are re-synchronized to the new list, each
    /// retaining its own prior `null` membership.
    pub fn set_type_list(&self, types: Option<Vec<String>>) {
        if !is_schema_object(self) {
            debug!(kind = self.kind().name(), "set_type_list ignored");
            return;
        }
        let flag = self.data().nullable;
        let types = match types {
            Some(mut list) => {
                if flag == Some(true) && !list.iter().any(|t| t == NULL_TYPE) {
                    list.push(NULL_TYPE.to_owned());
                }
                // The explicit list now owns nullability.
                self.data_mut().nullable = None;
                Some(list)
            }
            // With no list, the flag remains the only carrier of
            // nullability and must survive.
            None => None,
        };
        raw_set_type_list(self, types.clone());

        let mut visited = vec![self.ptr_id()];
        for observer in observers_of(self) {
            apply_observed_types(&observer, types.as_ref(), &mut visited);
        }
    }

    /// Add one tag to the type list, creating the list when absent. The tag
    /// set is kept duplicate-free. Observers receive the same addition.
    pub fn add_type(&self, tag: &str) {
        if !is_schema_object(self) {
            return;
        }
        let mut visited = Vec::new();
        add_type_inner(self, tag, &mut visited);
    }

    /// Remove one tag from the type list, if present. Observers receive the
    /// same removal.
    pub fn remove_type(&self, tag: &str) {
        if !is_schema_object(self) {
            return;
        }
        let mut visited = Vec::new();
        remove_type_inner(self, tag, &mut visited);
    }

    /// Set the legacy nullable flag.
    ///
    /// `Some(true)` appends the `null` tag to a present type list;
    /// `Some(false)` and `None` remove it. The flag itself is stored
    /// independently so that [`ModelNode::nullable`] can preserve the
    /// legacy tri-state distinction between "unknown" and "explicitly
    /// false". Observers are not notified: their `null` membership is
    /// theirs alone.
    pub fn set_nullable(&self, nullable: Option<bool>) {
        if !is_schema_object(self) {
            return;
        }
        {
            let mut data = self.data_mut();
            data.nullable = nullable;
            data.mod_count += 1;
        }

        let types = raw_type_list(self);
        if nullable == Some(true) {
            if let Some(mut list) = types {
                if !list.iter().any(|t| t == NULL_TYPE) {
                    list.push(NULL_TYPE.to_owned());
                    raw_set_type_list(self, Some(list));
                }
            }
        } else if let Some(list) = types {
            if list.iter().any(|t| t == NULL_TYPE) {
                let filtered: Vec<String> =
                    list.into_iter().filter(|t| t != NULL_TYPE).collect();
                raw_set_type_list(self, Some(filtered));
            }
        }
    }

    /// The legacy tri-state nullable view.
    ///
    /// When the type list is absent, returns whatever the flag holds. When
    /// the list is present, returns `Some(true)` if it contains `null`,
    /// `Some(false)` if `null` is absent but the flag was explicitly set,
    /// and `None` when neither source conveys information.
    #[must_use]
    pub fn nullable(&self) -> Option<bool> {
        if !is_schema_object(self) {
            return None;
        }
        let flag = self.data().nullable;
        match raw_type_list(self) {
            None => flag,
            Some(list) => {
                let permitted = list.iter().any(|t| t == NULL_TYPE);
                if !permitted && flag.is_none() {
                    None
                } else {
                    Some(permitted)
                }
            }
        }
    }

    /// Register `observer` as a type observer of this schema and
    /// synchronize it immediately with the current type list.
    pub fn add_type_observer(&self, observer: &ModelNode) {
        if !is_schema_object(self) || !is_schema_object(observer) {
            debug!("type observer registration ignored for non-schema node");
            return;
        }
        {
            let mut data = self.data_mut();
            data.observers.push(observer.clone());
            data.mod_count += 1;
        }
        let types = raw_type_list(self);
        let mut visited = vec![self.ptr_id()];
        apply_observed_types(observer, types.as_ref(), &mut visited);
    }

    /// The first type tag that is not `null`, or `None` when the list is
    /// absent or holds only `null`.
    #[must_use]
    pub fn non_null_type(&self) -> Option<String> {
        self.type_list()?
            .into_iter()
            .find(|tag| tag != NULL_TYPE)
    }
}

/// Set types on an observer, retaining the observer's own `null` membership,
/// then cascade to the observer's observers.
fn apply_observed_types(
    observer: &ModelNode,
    new_types: Option<&Vec<String>>,
    visited: &mut Vec<usize>,
) {
    if visited.contains(&observer.ptr_id()) {
        return;
    }
    visited.push(observer.ptr_id());
    if !is_schema_object(observer) {
        return;
    }

    let old = raw_type_list(observer);
    let merged: Option<Vec<String>> = new_types.map(|types| {
        let mut next = types.clone();
        let had_null = old
            .as_ref()
            .is_some_and(|list| list.iter().any(|t| t == NULL_TYPE));
        if had_null && !next.iter().any(|t| t == NULL_TYPE) {
            next.push(NULL_TYPE.to_owned());
        }
        next
    });
    raw_set_type_list(observer, merged.clone());

    for next_observer in observers_of(observer) {
        apply_observed_types(&next_observer, merged.as_ref(), visited);
    }
}

fn add_type_inner(node: &ModelNode, tag: &str, visited: &mut Vec<usize>) {
    if visited.contains(&node.ptr_id()) {
        return;
    }
    visited.push(node.ptr_id());
    if !is_schema_object(node) {
        return;
    }

    let mut list = raw_type_list(node).unwrap_or_default();
    if !list.iter().any(|t| t == tag) {
        list.push(tag.to_owned());
    }
    raw_set_type_list(node, Some(list));

    for observer in observers_of(node) {
        add_type_inner(&observer, tag, visited);
    }
}

fn remove_type_inner(node: &ModelNode, tag: &str, visited: &mut Vec<usize>) {
    if visited.contains(&node.ptr_id()) {
        return;
    }
    visited.push(node.ptr_id());
    if !is_schema_object(node) {
        return;
    }

    if let Some(list) = raw_type_list(node) {
        let filtered: Vec<String> = list.into_iter().filter(|t| t != tag).collect();
        raw_set_type_list(node, Some(filtered));
    }

    for observer in observers_of(node) {
        remove_type_inner(&observer, tag, visited);
    }
}
