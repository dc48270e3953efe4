//! Path accessor - read and write nested values by dotted path
//!
//! Membership is presence, never truthiness: a stored `null`, `0`, `""` or
//! `false` is a hit. Writes auto-vivify mappings, never arrays. An index past
//! the end of an existing array grows it, padding the gap with `null`.

use serde::de::DeserializeOwned;
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::error::{ReflectError, Result};
use crate::types::{index, Path, MAX_ARRAY_INDEX};

/// Borrow the value at `path`, or `None` if any segment is absent
pub fn lookup<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments()
        .try_fold(root, |current, segment| member(current, segment))
}

/// Mutably borrow the value at `path`, or `None` if any segment is absent
pub fn lookup_mut<'a>(root: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    path.segments()
        .try_fold(root, |current, segment| member_mut(current, segment))
}

/// Read the value at `path`, falling back to `fallback` on a miss
pub fn get(root: &Value, path: &Path, fallback: Value) -> Value {
    lookup(root, path).cloned().unwrap_or(fallback)
}

/// Read the value at `path`, `null` on a miss
pub fn get_or_null(root: &Value, path: &Path) -> Value {
    get(root, path, Value::Null)
}

/// Read and deserialize the value at `path`.
///
/// A miss is `Ok(None)`; a value of the wrong shape is `ReflectError::Type`.
pub fn get_as<T: DeserializeOwned>(root: &Value, path: &Path) -> Result<Option<T>> {
    match lookup(root, path) {
        Some(value) => Ok(Some(T::deserialize(value)?)),
        None => Ok(None),
    }
}

/// Write `value` at `path`, creating intermediate mappings as needed.
///
/// Arrays grow to reach an index past their end. Fails only where JSON has
/// no room for the write: a scalar in the way (`NotAContainer`), a key on an
/// array (`InvalidIndex`), or an index above [`MAX_ARRAY_INDEX`]
/// (`IndexOutOfBounds`). Returns a reference to the stored value.
///
/// ```
/// use reflect::{accessor, Path};
/// use serde_json::json;
///
/// let mut root = json!({});
/// let path: Path = "foo.foo.bar".parse().unwrap();
/// accessor::set(&mut root, &path, json!("baz")).unwrap();
/// assert_eq!(root, json!({ "foo": { "foo": { "bar": "baz" } } }));
/// ```
pub fn set<'a>(root: &'a mut Value, path: &Path, value: Value) -> Result<&'a mut Value> {
    let (last, parents) = path.split_last();

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        current = child_or_insert(current, segment, path, depth)?;
    }

    assign(current, last, value, path, parents.len())
}

fn member<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn member_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => index(segment).and_then(move |i| items.get_mut(i)),
        _ => None,
    }
}

fn child_or_insert<'a>(
    current: &'a mut Value,
    segment: &str,
    path: &Path,
    depth: usize,
) -> Result<&'a mut Value> {
    match current {
        Value::Object(map) => Ok(map
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let i = slot(items, segment, path, depth)?;
            if i == items.len() {
                items.push(Value::Object(Map::new()));
            } else if items[i].is_null() {
                // null slot, e.g. padding from an earlier write
                items[i] = Value::Object(Map::new());
            }
            Ok(&mut items[i])
        }
        other => Err(ReflectError::NotAContainer {
            at: parent_of(path, depth),
            kind: kind(other),
        }),
    }
}

fn assign<'a>(
    current: &'a mut Value,
    segment: &str,
    value: Value,
    path: &Path,
    depth: usize,
) -> Result<&'a mut Value> {
    match current {
        Value::Object(map) => match map.entry(segment) {
            Entry::Occupied(mut entry) => {
                entry.insert(value);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(value)),
        },
        Value::Array(items) => {
            let i = slot(items, segment, path, depth)?;
            if i == items.len() {
                items.push(value);
            } else {
                items[i] = value;
            }
            Ok(&mut items[i])
        }
        other => Err(ReflectError::NotAContainer {
            at: parent_of(path, depth),
            kind: kind(other),
        }),
    }
}

/// Resolve `segment` to a slot of `items`, padding with `null` so that the
/// slot either exists or is the next one to push
fn slot(items: &mut Vec<Value>, segment: &str, path: &Path, depth: usize) -> Result<usize> {
    let i = index(segment).ok_or_else(|| ReflectError::InvalidIndex {
        at: parent_of(path, depth),
        segment: segment.to_string(),
    })?;
    if i > MAX_ARRAY_INDEX {
        return Err(ReflectError::IndexOutOfBounds {
            at: parent_of(path, depth),
            index: i,
            len: items.len(),
        });
    }
    if i > items.len() {
        items.resize(i, Value::Null);
    }
    Ok(i)
}

/// Dotted path of the container holding segment `depth` (`$` for the root)
fn parent_of(path: &Path, depth: usize) -> String {
    if depth == 0 {
        "$".to_string()
    } else {
        path.prefix(depth - 1)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
