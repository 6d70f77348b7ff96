use schemata_schema::{path, Definition, Schema, ValidatorRegistry};
use schemata_store::{AsyncStore, Query, WriteOp};
use schemata_types::Value;
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};

/// A named schema bound to a primary key.
///
/// Validation runs through [`Schema::create`]; persistence goes to whichever
/// [`AsyncStore`] the caller passes, under this model's name.
#[derive(Clone, Debug)]
pub struct Model {
    name: String,
    schema: Schema,
    primary_key: String,
}

impl Model {
    /// Compile a model with the default configuration.
    pub fn new(name: impl Into<String>, definition: &Definition) -> ModelResult<Self> {
        Self::with_config(name, definition, &ModelConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        definition: &Definition,
        config: &ModelConfig,
    ) -> ModelResult<Self> {
        let schema = Schema::with_config(definition, config.schema())?;
        Self::from_schema(name, schema)
    }

    /// Parse and compile a JSON definition with the default configuration.
    pub fn from_json(
        name: impl Into<String>,
        json: &serde_json::Value,
        validators: &ValidatorRegistry,
    ) -> ModelResult<Self> {
        let definition = Definition::from_json(json, validators)?;
        Self::new(name, &definition)
    }

    /// Wrap an already compiled schema. The schema must have a primary key.
    pub fn from_schema(name: impl Into<String>, schema: Schema) -> ModelResult<Self> {
        let name = name.into();
        let Some(primary_key) = schema.primary_key().map(str::to_string) else {
            return Err(ModelError::NoPrimaryKey { model: name });
        };
        Ok(Self {
            name,
            schema,
            primary_key,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// The storage key of a validated instance.
    ///
    /// Strings are used as-is and numbers by their display form.
    pub fn key_of(&self, instance: &Value) -> ModelResult<String> {
        match path::read(instance, &self.primary_key) {
            Ok(Value::String(key)) => Ok(key),
            Ok(number @ Value::Number(_)) => Ok(number.to_string()),
            Ok(other) => Err(ModelError::InvalidKey {
                field: self.primary_key.clone(),
                found: other.kind_tag().to_string(),
            }),
            Err(_) => Err(ModelError::InvalidKey {
                field: self.primary_key.clone(),
                found: "nothing".to_string(),
            }),
        }
    }

    /// Fetch the instance stored under `key`.
    pub async fn get<S>(&self, key: &str, store: &S) -> ModelResult<Value>
    where
        S: AsyncStore + ?Sized,
    {
        store
            .get(&self.name, key)
            .await?
            .ok_or_else(|| ModelError::NotFound {
                model: self.name.clone(),
                key: key.to_string(),
            })
    }

    /// Validate `candidate` and store it as a new entry.
    pub async fn create<S>(&self, candidate: &Value, store: &S) -> ModelResult<Value>
    where
        S: AsyncStore + ?Sized,
    {
        self.set(candidate, WriteOp::Create, store).await
    }

    /// Validate `candidate` and replace the existing entry with the same key.
    pub async fn update<S>(&self, candidate: &Value, store: &S) -> ModelResult<Value>
    where
        S: AsyncStore + ?Sized,
    {
        self.set(candidate, WriteOp::Update, store).await
    }

    async fn set<S>(&self, candidate: &Value, op: WriteOp, store: &S) -> ModelResult<Value>
    where
        S: AsyncStore + ?Sized,
    {
        let instance = self.schema.create(candidate)?;
        let key = self.key_of(&instance)?;

        if op == WriteOp::Update && store.get(&self.name, &key).await?.is_none() {
            return Err(ModelError::NotFound {
                model: self.name.clone(),
                key,
            });
        }

        store.set(&self.name, &key, &instance, op).await?;
        debug!(model = %self.name, key = %key, op = op.as_str(), "instance stored");
        Ok(instance)
    }

    /// Delete the entry under `key`. Returns `true` if it existed.
    pub async fn delete<S>(&self, key: &str, store: &S) -> ModelResult<bool>
    where
        S: AsyncStore + ?Sized,
    {
        Ok(store.delete(&self.name, key).await?)
    }

    /// Every stored instance matching `query`.
    pub async fn filter<S>(&self, query: &Query, store: &S) -> ModelResult<Vec<Value>>
    where
        S: AsyncStore + ?Sized,
    {
        Ok(store.filter(&self.name, query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_schema::{ConstructionError, Descriptor};
    use schemata_store::{InMemoryStore, Store};
    use schemata_types::Kind;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn user_model() -> Model {
        Model::from_json(
            "user",
            &json!({
                "name": {"type": "String", "required": true},
                "age": "Number"
            }),
            &ValidatorRegistry::new(),
        )
        .unwrap()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn implicit_primary_key_is_added() {
        let model = user_model();
        assert_eq!(model.primary_key(), "pk");
        assert_eq!(model.schema().properties()[0].key(), "pk");
        assert_eq!(model.schema().properties()[0].kind(), Kind::String);
    }

    #[test]
    fn explicit_primary_key_is_kept() {
        let model = Model::new(
            "item",
            &Definition::new().field("sku", Descriptor::new(Kind::Number).primary_key()),
        )
        .unwrap();
        assert_eq!(model.primary_key(), "sku");
        assert_eq!(model.schema().len(), 1);
    }

    #[test]
    fn schema_without_primary_key_is_rejected() {
        let schema = Schema::new(&Definition::new().field("name", "String")).unwrap();
        let err = Model::from_schema("user", schema).unwrap_err();
        assert!(matches!(err, ModelError::NoPrimaryKey { .. }));

        let config = ModelConfig {
            implicit_primary_key: None,
            ..Default::default()
        };
        let err = Model::with_config("user", &Definition::new().field("n", "Number"), &config)
            .unwrap_err();
        assert!(matches!(err, ModelError::NoPrimaryKey { .. }));
    }

    #[test]
    fn missing_definition_is_rejected() {
        let err = Model::from_json("user", &json!(null), &ValidatorRegistry::new()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Construction(ConstructionError::MissingDefinition)
        ));
    }

    #[test]
    fn key_of_numbers_and_strings() {
        let model = Model::new(
            "item",
            &Definition::new().field("sku", Descriptor::new(Kind::Number).primary_key()),
        )
        .unwrap();
        assert_eq!(model.key_of(&v(json!({"sku": 42}))).unwrap(), "42");
        assert_eq!(user_model().key_of(&v(json!({"pk": "a"}))).unwrap(), "a");
        assert!(matches!(
            user_model().key_of(&v(json!({"pk": true}))),
            Err(ModelError::InvalidKey { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn create_then_get() {
        let store = InMemoryStore::new();
        let model = user_model();
        let created = model
            .create(&v(json!({"pk": "1", "name": "Ada", "junk": true})), &store)
            .await
            .unwrap();
        assert_eq!(created, v(json!({"pk": "1", "name": "Ada"})));
        assert_eq!(model.get("1", &store).await.unwrap(), created);
    }

    #[tokio::test]
    async fn get_missing_reports_key() {
        let store = InMemoryStore::new();
        let err = user_model().get("nope", &store).await.unwrap_err();
        assert_eq!(err.to_string(), "Instance with pk nope is not found");
    }

    #[tokio::test]
    async fn invalid_candidate_is_not_stored() {
        let store = InMemoryStore::new();
        let err = user_model()
            .create(&v(json!({"pk": "1", "name": 5})), &store)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Property .name should be of type String");
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn missing_primary_key_is_a_validation_error() {
        let store = InMemoryStore::new();
        let err = user_model()
            .create(&v(json!({"name": "Ada"})), &store)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Property .pk is required");
    }

    #[tokio::test]
    async fn create_twice_conflicts() {
        let store = InMemoryStore::new();
        let model = user_model();
        let candidate = v(json!({"pk": "1", "name": "Ada"}));
        model.create(&candidate, &store).await.unwrap();
        let err = model.create(&candidate, &store).await.unwrap_err();
        assert!(matches!(err, ModelError::AlreadyExists { ref key, .. } if key == "1"));
    }

    #[tokio::test]
    async fn update_requires_existing_entry() {
        let store = InMemoryStore::new();
        let model = user_model();
        let err = model
            .update(&v(json!({"pk": "1", "name": "Ada"})), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));

        model.create(&v(json!({"pk": "1", "name": "Ada"})), &store).await.unwrap();
        let updated = model
            .update(&v(json!({"pk": "1", "name": "Grace", "age": 85})), &store)
            .await
            .unwrap();
        assert_eq!(store.get_entry("user", "1").unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn delete_and_filter() {
        let store = InMemoryStore::new();
        let model = user_model();
        for (pk, name) in [("1", "Ada"), ("2", "Bob"), ("3", "Ada")] {
            model
                .create(&v(json!({"pk": pk, "name": name})), &store)
                .await
                .unwrap();
        }

        let adas = model
            .filter(&Query::new().where_eq("name", "Ada"), &store)
            .await
            .unwrap();
        assert_eq!(adas.len(), 2);

        assert!(model.delete("1", &store).await.unwrap());
        assert!(!model.delete("1", &store).await.unwrap());
        let adas = model
            .filter(&Query::new().where_eq("name", "Ada"), &store)
            .await
            .unwrap();
        assert_eq!(adas, vec![v(json!({"pk": "3", "name": "Ada"}))]);
    }
}
