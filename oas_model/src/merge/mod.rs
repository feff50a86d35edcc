//! The merge engine: folds several partial documents into one.
//!
//! Merging is directed: `merge(target, source)` applies `source` into
//! `target` under each property's merge directive. The engine is
//! deterministic but not commutative; callers fold sources in the fixed
//! precedence order owned by [`crate::assembly::AssemblyContext`], with the
//! running accumulator as the target. Under the default directive a scalar
//! already occupied in the accumulator wins, so earlier-folded sources take
//! scalar precedence while later sources fill gaps and extend containers.

use tracing::warn;

use crate::model::{ModelNode, Value};
use crate::registry::{MergeDirective, ModelType};

#[cfg(test)]
mod tests;

/// Merge `source` into `target`.
///
/// Both bags should be of the same model kind; bags of different kinds are
/// skipped deterministically (the target is left as-is), as is any pairing
/// involving a boolean-mode schema, which is atomic and not
/// merge-compatible with an object-shaped schema. Neither case is an
/// error.
pub fn merge(target: &ModelNode, source: &ModelNode) {
    let mut stack = Vec::new();
    merge_nodes(target, source, &mut stack);
}

fn merge_nodes(target: &ModelNode, source: &ModelNode, stack: &mut Vec<usize>) {
    if target.same_node(source) {
        return;
    }
    if target.is_boolean_schema() || source.is_boolean_schema() {
        // Boolean schemas are atomic; leave the target untouched.
        return;
    }
    if target.kind() != source.kind() {
        warn!(
            occupying = target.kind().name(),
            incoming = source.kind().name(),
            "kind mismatch skipped during merge"
        );
        return;
    }
    if stack.contains(&target.ptr_id()) || stack.contains(&source.ptr_id()) {
        warn!(kind = target.kind().name(), "cyclic reference avoided during merge");
        return;
    }
    stack.push(target.ptr_id());
    stack.push(source.ptr_id());

    let record = target.record();

    for descriptor in record.properties() {
        if descriptor.is_unwrapped() {
            // Unwrapped entries are raw keys, handled with the undeclared
            // keys below.
            continue;
        }
        let wire = descriptor.wire_name();
        let incoming = source.data().properties.get(wire).cloned();
        let occupied = target.data().properties.contains_key(wire);

        match descriptor.directive() {
            MergeDirective::PreserveValue => {
                if !occupied {
                    if let Some(incoming) = incoming {
                        target
                            .data_mut()
                            .properties
                            .insert(wire.to_owned(), incoming.deep_copy());
                    }
                }
            }
            MergeDirective::OverrideValue => {
                if let Some(incoming) = incoming {
                    target
                        .data_mut()
                        .properties
                        .insert(wire.to_owned(), incoming.deep_copy());
                }
            }
            MergeDirective::MergeValues => {
                if let Some(incoming) = incoming {
                    if occupied {
                        merge_existing(target, wire, &incoming, stack);
                    } else {
                        target
                            .data_mut()
                            .properties
                            .insert(wire.to_owned(), incoming.deep_copy());
                    }
                }
            }
        }
    }

    // Undeclared raw keys: unwrapped entries and dynamic keywords.
    let undeclared: Vec<String> = source
        .data()
        .properties
        .keys()
        .filter(|key| record.property(key.as_str()).is_none())
        .cloned()
        .collect();
    for key in undeclared {
        let incoming = source.data().properties.get(&key).cloned();
        let Some(incoming) = incoming else { continue };
        if target.data().properties.contains_key(&key) {
            merge_existing(target, &key, &incoming, stack);
        } else {
            target
                .data_mut()
                .properties
                .insert(key, incoming.deep_copy());
        }
    }

    merge_extensions(target, source);
    target.touch();

    stack.pop();
    stack.pop();
}

fn merge_existing(target: &ModelNode, key: &str, incoming: &Value, stack: &mut Vec<usize>) {
    let existing = target.data().properties.get(key).cloned();
    let Some(existing) = existing else {
        return;
    };
    let merged = merge_value(existing, incoming, stack);
    target.data_mut().properties.insert(key.to_owned(), merged);
}

fn merge_value(existing: Value, incoming: &Value, stack: &mut Vec<usize>) -> Value {
    match (existing, incoming) {
        (Value::Model(target), Value::Model(source)) => {
            merge_nodes(&target, source, stack);
            Value::Model(target)
        }
        (Value::Map(mut entries), Value::Map(source_entries)) => {
            for (key, incoming_entry) in source_entries {
                match entries.get(key).cloned() {
                    Some(existing_entry) => {
                        let merged = merge_value(existing_entry, incoming_entry, stack);
                        entries.insert(key.clone(), merged);
                    }
                    None => {
                        entries.insert(key.clone(), incoming_entry.deep_copy());
                    }
                }
            }
            Value::Map(entries)
        }
        (Value::List(items), Value::List(source_items)) => {
            Value::List(merge_lists(items, source_items, stack))
        }
        // Scalars and shape mismatches: the occupying side wins.
        (existing, _) => existing,
    }
}

fn merge_lists(mut items: Vec<Value>, source_items: &[Value], stack: &mut Vec<usize>) -> Vec<Value> {
    for incoming in source_items {
        match identity_key(incoming) {
            Some(key) => {
                let matched = items
                    .iter()
                    .find(|existing| identity_key(existing).as_deref() == Some(key.as_str()))
                    .cloned();
                match matched {
                    Some(Value::Model(existing)) => {
                        if let Some(source) = incoming.as_model() {
                            merge_nodes(&existing, source, stack);
                        }
                    }
                    Some(_) | None => items.push(incoming.deep_copy()),
                }
            }
            None => {
                if !items.iter().any(|existing| existing == incoming) {
                    items.push(incoming.deep_copy());
                }
            }
        }
    }
    items
}

/// The natural identity key of a list element, where its kind defines one:
/// tags are identified by name, servers by URL, parameters by name and
/// location. Everything else deduplicates by deep equality.
fn identity_key(value: &Value) -> Option<String> {
    let node = value.as_model()?;
    match node.kind() {
        ModelType::Tag => node.string_property("name"),
        ModelType::Server => node.string_property("url"),
        ModelType::Parameter => {
            let name = node.string_property("name")?;
            let location = node.string_property("in")?;
            Some(format!("{name}:{location}"))
        }
        _ => None,
    }
}

fn merge_extensions(target: &ModelNode, source: &ModelNode) {
    let incoming: Vec<(String, serde_json::Value)> = source
        .data()
        .extensions
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let mut data = target.data_mut();
    for (name, value) in incoming {
        // Extension payloads are uninterpreted and therefore atomic: the
        // occupying side wins, new names are added.
        data.extensions.entry(name).or_insert(value);
    }
}
