//! Post-order document filtering.
//!
//! A filter visits every model node in the assembled document, children
//! before parents, and may keep, remove or replace each one. Traversal is
//! cycle-safe; a node reachable twice through a cycle is visited once.

use tracing::warn;

use crate::model::{ModelNode, Value};
use crate::registry::ModelType;

/// A filter's decision for one visited node.
#[derive(Debug)]
pub enum FilterOutcome {
    /// Keep the node as-is (the filter may still have mutated it in place).
    Keep,
    /// Remove the node from its containing property, list or map.
    Remove,
    /// Substitute another node.
    Replace(ModelNode),
}

/// A mutation stage applied to the fully merged canonical document before
/// serialization.
pub trait DocumentFilter {
    /// Visit one model node. The default keeps everything.
    fn filter_model(&mut self, kind: ModelType, node: &ModelNode) -> FilterOutcome {
        let _ = (kind, node);
        FilterOutcome::Keep
    }
}

/// Apply `filter` to the whole tree under (and including) `document`.
///
/// Returns the resulting root: `None` when the filter removed it, the
/// replacement when the filter substituted it, otherwise `document` itself.
pub fn apply_filter(document: &ModelNode, filter: &mut dyn DocumentFilter) -> Option<ModelNode> {
    let mut stack = Vec::new();
    filter_children(document, filter, &mut stack);
    match filter.filter_model(document.kind(), document) {
        FilterOutcome::Keep => Some(document.clone()),
        FilterOutcome::Remove => None,
        FilterOutcome::Replace(replacement) => Some(replacement),
    }
}

fn filter_children(node: &ModelNode, filter: &mut dyn DocumentFilter, stack: &mut Vec<usize>) {
    if stack.contains(&node.ptr_id()) {
        warn!(kind = node.kind().name(), "cyclic reference skipped during filtering");
        return;
    }
    stack.push(node.ptr_id());

    let keys: Vec<String> = node.data().properties.keys().cloned().collect();
    let mut changed = false;
    for key in keys {
        let Some(value) = node.data().properties.get(&key).cloned() else {
            continue;
        };
        match filter_value(value, filter, stack) {
            Some(updated) => {
                node.data_mut().properties.insert(key, updated);
            }
            None => {
                node.data_mut().properties.shift_remove(&key);
                changed = true;
            }
        }
    }
    if changed {
        node.touch();
    }

    stack.pop();
}

fn filter_value(
    value: Value,
    filter: &mut dyn DocumentFilter,
    stack: &mut Vec<usize>,
) -> Option<Value> {
    match value {
        Value::Model(child) => {
            if stack.contains(&child.ptr_id()) {
                warn!(
                    kind = child.kind().name(),
                    "cyclic reference skipped during filtering"
                );
                return Some(Value::Model(child));
            }
            filter_children(&child, filter, stack);
            match filter.filter_model(child.kind(), &child) {
                FilterOutcome::Keep => Some(Value::Model(child)),
                FilterOutcome::Remove => None,
                FilterOutcome::Replace(replacement) => Some(Value::Model(replacement)),
            }
        }
        Value::List(items) => Some(Value::List(
            items
                .into_iter()
                .filter_map(|item| filter_value(item, filter, stack))
                .collect(),
        )),
        Value::Map(entries) => Some(Value::Map(
            entries
                .into_iter()
                .filter_map(|(key, entry)| {
                    filter_value(entry, filter, stack).map(|updated| (key, updated))
                })
                .collect(),
        )),
        scalar @ Value::Scalar(_) => Some(scalar),
    }
}
