//! Non-destructive structural merge
//!
//! Extend a namespace with the members of one or more sources without
//! touching anything the target already defines. First writer wins: once a
//! key is on the target, later sources cannot replace it.

use serde_json::map::Entry;
use serde_json::{Map, Value};

/// Copy every key of every source that the target does not already have.
///
/// Sources are visited in order, keys in each source's insertion order.
/// Returns the target for chaining.
pub fn merge<'t, 's, I>(target: &'t mut Map<String, Value>, sources: I) -> &'t mut Map<String, Value>
where
    I: IntoIterator<Item = &'s Map<String, Value>>,
{
    for source in sources {
        for (key, value) in source {
            if !target.contains_key(key) {
                target.insert(key.clone(), value.clone());
            }
        }
    }

    target
}

/// [`merge`] taking the sources by value.
///
/// Values are moved into the target, never cloned; keys the target already
/// has are dropped along with the rest of their source.
pub fn merge_owned<I>(target: &mut Map<String, Value>, sources: I) -> &mut Map<String, Value>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    for source in sources {
        for (key, value) in source {
            if let Entry::Vacant(slot) = target.entry(key) {
                slot.insert(value);
            }
        }
    }

    target
}

/// [`merge`] over plain values.
///
/// Only object targets are extended and only object sources contribute;
/// anything else passes through unchanged.
pub fn merge_value<'t, 's, I>(target: &'t mut Value, sources: I) -> &'t mut Value
where
    I: IntoIterator<Item = &'s Value>,
{
    if let Value::Object(map) = &mut *target {
        merge(map, sources.into_iter().filter_map(Value::as_object));
    }

    target
}
