//! Exact-match filters over stored instances.

use schemata_schema::path::{self, ELEMENT_SEGMENT};
use schemata_types::Value;

/// A conjunction of `path == value` conditions.
///
/// Paths are resolved with the schema path resolver, so `address.city` reaches
/// into nested objects and `tags.of.name` matches when any element of `tags`
/// has that `name`. An empty query matches everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    conditions: Vec<(String, Value)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition, builder style.
    pub fn where_eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((path.into(), value.into()));
        self
    }

    /// Build a query from a JSON object whose keys are paths.
    ///
    /// Returns `None` for anything but an object.
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        let fields = json.as_object()?;
        Some(
            fields
                .iter()
                .fold(Self::new(), |query, (path, value)| query.where_eq(path.as_str(), value)),
        )
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns `true` if `instance` satisfies every condition.
    pub fn matches(&self, instance: &Value) -> bool {
        self.conditions.iter().all(|(field, expected)| {
            let Ok(found) = path::read(instance, field) else {
                return false;
            };
            let fanout = path::segments(field)
                .iter()
                .filter(|s| **s == ELEMENT_SEGMENT)
                .count();
            any_equal(&found, expected, fanout)
        })
    }
}

/// Each `of` in a path wraps the resolved values in one more array level.
fn any_equal(found: &Value, expected: &Value, fanout: usize) -> bool {
    if found == expected {
        return true;
    }
    match (fanout, found) {
        (0, _) => false,
        (_, Value::Array(items)) => items.iter().any(|item| any_equal(item, expected, fanout - 1)),
        _ => false,
    }
}
