use std::collections::hash_map::Entry;
use std::collections::HashMap;

use schemata_schema::{Definition, ValidatorRegistry};
use schemata_store::{AsyncStore, Query};
use schemata_types::Value;
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;

/// Named models sharing one configuration.
///
/// Operations address a model by name and fail with
/// [`ModelError::UnknownModel`] for names that were never defined.
#[derive(Debug, Default)]
pub struct Registry {
    models: HashMap<String, Model>,
    config: ModelConfig,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            models: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Compile and register a model. Redefining a name replaces the old model.
    pub fn define(&mut self, name: &str, definition: &Definition) -> ModelResult<&Model> {
        let model = Model::with_config(name, definition, &self.config)?;
        Ok(self.insert(model))
    }

    /// Compile and register a model from a JSON definition.
    pub fn define_json(
        &mut self,
        name: &str,
        json: &serde_json::Value,
        validators: &ValidatorRegistry,
    ) -> ModelResult<&Model> {
        let definition = Definition::from_json(json, validators)?;
        self.define(name, &definition)
    }

    fn insert(&mut self, model: Model) -> &Model {
        let name = model.name().to_string();
        debug!(
            model = %name,
            primary_key = model.primary_key(),
            fields = model.schema().len(),
            "model registered"
        );
        match self.models.entry(name) {
            Entry::Occupied(mut slot) => {
                slot.insert(model);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(model),
        }
    }

    pub fn model(&self, name: &str) -> ModelResult<&Model> {
        self.models
            .get(name)
            .ok_or_else(|| ModelError::UnknownModel(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered model names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub async fn get<S>(&self, name: &str, key: &str, store: &S) -> ModelResult<Value>
    where
        S: AsyncStore + ?Sized,
    {
        self.model(name)?.get(key, store).await
    }

    pub async fn create<S>(&self, name: &str, candidate: &Value, store: &S) -> ModelResult<Value>
    where
        S: AsyncStore + ?Sized,
    {
        self.model(name)?.create(candidate, store).await
    }

    pub async fn update<S>(&self, name: &str, candidate: &Value, store: &S) -> ModelResult<Value>
    where
        S: AsyncStore + ?Sized,
    {
        self.model(name)?.update(candidate, store).await
    }

    pub async fn delete<S>(&self, name: &str, key: &str, store: &S) -> ModelResult<bool>
    where
        S: AsyncStore + ?Sized,
    {
        self.model(name)?.delete(key, store).await
    }

    pub async fn filter<S>(&self, name: &str, query: &Query, store: &S) -> ModelResult<Vec<Value>>
    where
        S: AsyncStore + ?Sized,
    {
        self.model(name)?.filter(query, store).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_store::InMemoryStore;
    use serde_json::json;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .define_json(
                "User",
                &json!({"name": {"type": "String", "required": true}}),
                &ValidatorRegistry::new(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn define_registers_by_name() {
        let registry = registry();
        assert!(registry.contains("User"));
        assert_eq!(registry.model("User").unwrap().primary_key(), "pk");
        assert_eq!(registry.names(), vec!["User"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn redefine_replaces() {
        let mut registry = registry();
        let model = registry
            .define("User", &Definition::new().field("email", "String"))
            .unwrap();
        assert!(model.schema().property("email").is_some());
        assert!(registry.model("User").unwrap().schema().property("name").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_define_registers_nothing() {
        let mut registry = Registry::new();
        let err = registry
            .define_json("Bad", &json!({"f": "Nope"}), &ValidatorRegistry::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Type Nope is not supported");
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn unknown_model_is_rejected() {
        let store = InMemoryStore::new();
        let err = registry().get("Ghost", "1", &store).await.unwrap_err();
        assert_eq!(err.to_string(), "Model Ghost is not defined");
    }

    #[tokio::test]
    async fn dispatches_by_name() {
        let store = InMemoryStore::new();
        let registry = registry();
        let candidate = Value::from(json!({"pk": "1", "name": "Ada"}));
        registry.create("User", &candidate, &store).await.unwrap();
        assert_eq!(registry.get("User", "1", &store).await.unwrap(), candidate);
        assert_eq!(
            registry
                .filter("User", &Query::new(), &store)
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(registry.delete("User", "1", &store).await.unwrap());
    }
}
