//! Dotted path resolution over nested [`Value`]s.
//!
//! A path is a `.`-separated list of object keys (`address.city`). Leading
//! dots are ignored, so root-anchored property paths (`.address.city`) resolve
//! the same way.
//!
//! The segment `of` is never a literal key. It stands for "every element of
//! the array here": reading across it maps the rest of the path over the
//! elements and returns an array of the results, writing across it applies the
//! rest of the write to each element.

use schemata_types::Value;

use crate::error::PathError;

/// The segment that descends into array elements.
pub const ELEMENT_SEGMENT: &str = "of";

/// Split a path into its non-empty segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// Read the value at `path`.
///
/// Fails with [`PathError::NotFound`] when any segment is missing, which is
/// how callers tell an absent field from one that is present but `Null`.
/// Across `of`, elements for which the rest of the path is absent are skipped.
pub fn read(container: &Value, path: &str) -> Result<Value, PathError> {
    read_steps(container, &segments(path)).ok_or_else(|| PathError::NotFound {
        path: path.to_string(),
    })
}

/// Returns `true` if `path` resolves in `container`.
pub fn contains(container: &Value, path: &str) -> bool {
    read_steps(container, &segments(path)).is_some()
}

fn read_steps(container: &Value, steps: &[&str]) -> Option<Value> {
    let Some((step, rest)) = steps.split_first() else {
        return Some(container.clone());
    };
    if *step == ELEMENT_SEGMENT {
        let items = container.as_array()?;
        let resolved = items.iter().filter_map(|item| read_steps(item, rest)).collect();
        return Some(Value::Array(resolved));
    }
    read_steps(container.get(step)?, rest)
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// Intermediate nodes that are not objects are replaced. Writing across `of`
/// where no array exists does nothing.
pub fn write(container: &mut Value, path: &str, value: Value) {
    write_steps(container, &segments(path), value);
}

fn write_steps(container: &mut Value, steps: &[&str], value: Value) {
    let Some((step, rest)) = steps.split_first() else {
        *container = value;
        return;
    };

    if *step == ELEMENT_SEGMENT {
        if let Some(items) = container.as_array_mut() {
            for item in items.iter_mut() {
                write_steps(item, rest, value.clone());
            }
        }
        return;
    }

    if !matches!(container, Value::Object(_)) {
        *container = Value::object();
    }
    let Value::Object(map) = container else {
        return;
    };

    // Never materialize a key just to find there is no array under it.
    if rest.first() == Some(&ELEMENT_SEGMENT) {
        if let Some(child) = map.get_mut(*step) {
            write_steps(child, rest, value);
        }
        return;
    }

    write_steps(map.entry((*step).to_string()).or_default(), rest, value);
}
