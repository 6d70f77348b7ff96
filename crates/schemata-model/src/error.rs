use schemata_schema::{ConstructionError, ValidationError};
use schemata_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// The definition could not be compiled.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// The candidate failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend failure other than a key conflict.
    #[error("store error: {0}")]
    Store(StoreError),

    /// No instance is stored under the key.
    #[error("Instance with pk {key} is not found")]
    NotFound { model: String, key: String },

    /// An instance is already stored under the key.
    #[error("Instance with pk {key} already exists")]
    AlreadyExists { model: String, key: String },

    /// The compiled schema has no primary-key field.
    #[error("Model {model} has no primary key")]
    NoPrimaryKey { model: String },

    /// The primary-key value is neither a string nor a number.
    #[error("Primary key {field} should be a String or Number, got {found}")]
    InvalidKey { field: String, found: String },

    /// No model is registered under the name.
    #[error("Model {0} is not defined")]
    UnknownModel(String),

    /// The TOML configuration could not be parsed.
    #[error("invalid model config: {0}")]
    Config(#[from] toml::de::Error),
}

/// Store conflicts surface as model-level errors; anything else stays a
/// backend failure.
impl From<StoreError> for ModelError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { model, key } => Self::NotFound { model, key },
            StoreError::AlreadyExists { model, key } => Self::AlreadyExists { model, key },
            other => Self::Store(other),
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
