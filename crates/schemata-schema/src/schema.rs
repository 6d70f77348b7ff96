use std::sync::Arc;

use schemata_types::Value;
use tracing::debug;

use crate::config::SchemaConfig;
use crate::definition::Definition;
use crate::error::{SchemaResult, ValidationError, ValidationResult};
use crate::path;
use crate::property::{Normalizer, Property};
use crate::validator::ValidatorRegistry;

/// A compiled, immutable schema.
///
/// Built once from a [`Definition`]; every [`create`](Schema::create) call
/// reads the schema and allocates its own instance, so one schema can be
/// shared freely across threads.
#[derive(Clone, Debug)]
pub struct Schema {
    properties: Vec<Property>,
    primary_key: Option<String>,
    config: Arc<SchemaConfig>,
}

impl Schema {
    /// Compile a definition with the default configuration.
    pub fn new(definition: &Definition) -> SchemaResult<Self> {
        Self::with_config(definition, SchemaConfig::default())
    }

    /// Compile a definition with an explicit configuration.
    pub fn with_config(definition: &Definition, config: SchemaConfig) -> SchemaResult<Self> {
        let schema = Normalizer::new(config).root(definition)?;
        debug!(
            fields = schema.properties.len(),
            primary_key = schema.primary_key.as_deref().unwrap_or("-"),
            "schema compiled"
        );
        Ok(schema)
    }

    /// Parse and compile a JSON definition with the default configuration.
    pub fn from_json(json: &serde_json::Value, validators: &ValidatorRegistry) -> SchemaResult<Self> {
        Self::from_json_with_config(json, validators, SchemaConfig::default())
    }

    /// Parse and compile a JSON definition.
    pub fn from_json_with_config(
        json: &serde_json::Value,
        validators: &ValidatorRegistry,
        config: SchemaConfig,
    ) -> SchemaResult<Self> {
        Self::with_config(&Definition::from_json(json, validators)?, config)
    }

    pub(crate) fn from_parts(
        properties: Vec<Property>,
        primary_key: Option<String>,
        config: Arc<SchemaConfig>,
    ) -> Self {
        Self {
            properties,
            primary_key,
            config,
        }
    }

    /// Validate `candidate` and build a fresh instance from it.
    ///
    /// Properties are processed in declaration order and the first failure is
    /// returned. The instance holds only the declared fields that were present
    /// or have a default; `candidate` is never modified.
    pub fn create(&self, candidate: &Value) -> ValidationResult<Value> {
        if candidate.as_object().is_none() {
            return Err(ValidationError::Invalid {
                message: format!(
                    "Candidate must be of type Object, got {}",
                    candidate.kind_tag()
                ),
            });
        }

        let mut instance = Value::object();
        for property in &self.properties {
            let value = match path::read(candidate, property.key()) {
                Ok(value) => value,
                Err(_) if property.is_required() || property.is_primary_key() => {
                    return Err(ValidationError::Required {
                        path: property.path().to_string(),
                        field: property.key().to_string(),
                    });
                }
                Err(_) => match property.default_value() {
                    Some(default) => default.clone(),
                    None => continue,
                },
            };
            let accepted = property.accept(value, &self.config)?;
            path::write(&mut instance, property.key(), accepted);
        }
        Ok(instance)
    }

    /// Validate a single array element against this element schema.
    pub(crate) fn accept_element(&self, item: Value) -> ValidationResult<Value> {
        match self.properties.first() {
            Some(property) => property.accept(item, &self.config),
            None => Ok(item),
        }
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Name of the primary-key field at this level, if any.
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// Look up a property by dotted path.
    ///
    /// `of` descends into an array's element schema, so `.items.of.name`
    /// finds the `name` field of the objects held in `items`.
    pub fn property(&self, path: &str) -> Option<&Property> {
        self.lookup(&path::segments(path))
    }

    fn lookup(&self, steps: &[&str]) -> Option<&Property> {
        self.properties.iter().find_map(|property| {
            let key = path::segments(property.key());
            let rest = steps.strip_prefix(key.as_slice())?;
            if rest.is_empty() {
                return Some(property);
            }
            property.descend()?.lookup(rest)
        })
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }
}
