use serde::{Deserialize, Serialize};

use schemata_schema::{ArrayErrorStyle, SchemaConfig};

use crate::error::ModelResult;

/// Primary-key field used when a model definition marks none.
pub const DEFAULT_PRIMARY_KEY: &str = "pk";

/// Configuration for models and the schemas they compile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Field that becomes the primary key when none is marked.
    pub implicit_primary_key: Option<String>,
    /// Location format for array element failures.
    pub array_errors: ArrayErrorStyle,
    /// Maximum nesting of Object/Array levels below the root.
    pub max_depth: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let schema = SchemaConfig::default();
        Self {
            implicit_primary_key: Some(DEFAULT_PRIMARY_KEY.to_string()),
            array_errors: schema.array_errors,
            max_depth: schema.max_depth,
        }
    }
}

impl ModelConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> ModelResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// The schema configuration models compile their definitions with.
    pub fn schema(&self) -> SchemaConfig {
        SchemaConfig {
            implicit_primary_key: self.implicit_primary_key.clone(),
            array_errors: self.array_errors,
            max_depth: self.max_depth,
        }
    }
}
