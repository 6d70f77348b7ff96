use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use schemata_types::Value;

type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// A custom field predicate.
///
/// Runs after the type check, so it only ever sees values of the field's
/// declared kind. Cheap to clone.
#[derive(Clone)]
pub struct Validator {
    name: Option<Arc<str>>,
    predicate: Arc<Predicate>,
}

impl Validator {
    /// Wrap an anonymous predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: None,
            predicate: Arc::new(predicate),
        }
    }

    /// Wrap a predicate under a name (used by [`ValidatorRegistry`]).
    pub fn named<F>(name: impl Into<Arc<str>>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Evaluate the predicate.
    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name().unwrap_or("<anonymous>"))
            .finish()
    }
}

/// Named predicates that JSON definitions can refer to.
///
/// A JSON definition cannot carry a function, so `"validate": "nonEmpty"`
/// names an entry here instead. Names that are not registered make the
/// definition fail to normalize.
#[derive(Clone, Debug, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Validator>,
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with a few general-purpose predicates:
    ///
    /// - `nonEmpty`: strings and arrays with at least one element/character
    /// - `positive`: numbers greater than zero
    /// - `integer`: numbers without a fractional part
    pub fn with_builtins() -> Self {
        Self::new()
            .with("nonEmpty", |v| match v {
                Value::String(s) => !s.is_empty(),
                Value::Array(items) => !items.is_empty(),
                _ => true,
            })
            .with("positive", |v| v.as_f64().is_some_and(|n| n > 0.0))
            .with("integer", |v| v.as_f64().is_some_and(|n| n.fract() == 0.0))
    }

    /// Register a predicate, builder style.
    pub fn with<F>(mut self, name: &str, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.register(name, predicate);
        self
    }

    /// Register (or replace) a predicate.
    pub fn register<F>(&mut self, name: &str, predicate: F)
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validators
            .insert(name.to_string(), Validator::named(name, predicate));
    }

    pub fn get(&self, name: &str) -> Option<Validator> {
        self.validators.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_validator() {
        let v = Validator::new(|v| v.as_str() == Some("ok"));
        assert!(v.check(&Value::from("ok")));
        assert!(!v.check(&Value::from("no")));
        assert!(v.name().is_none());
        assert!(format!("{v:?}").contains("<anonymous>"));
    }

    #[test]
    fn registry_lookup() {
        let registry = ValidatorRegistry::new().with("short", |v| {
            v.as_str().is_some_and(|s| s.len() < 4)
        });
        let short = registry.get("short").unwrap();
        assert_eq!(short.name(), Some("short"));
        assert!(short.check(&Value::from("abc")));
        assert!(!short.check(&Value::from("abcd")));
        assert!(registry.get("long").is_none());
    }

    #[test]
    fn builtins() {
        let registry = ValidatorRegistry::with_builtins();
        assert_eq!(registry.len(), 3);

        let non_empty = registry.get("nonEmpty").unwrap();
        assert!(!non_empty.check(&Value::from("")));
        assert!(non_empty.check(&Value::Array(vec![Value::Null])));

        let positive = registry.get("positive").unwrap();
        assert!(positive.check(&Value::from(1)));
        assert!(!positive.check(&Value::from(0)));

        let integer = registry.get("integer").unwrap();
        assert!(integer.check(&Value::from(3)));
        assert!(!integer.check(&Value::from(3.5)));
    }

    #[test]
    fn register_replaces() {
        let mut registry = ValidatorRegistry::new();
        registry.register("x", |_| false);
        registry.register("x", |_| true);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("x").unwrap().check(&Value::Null));
    }
}
