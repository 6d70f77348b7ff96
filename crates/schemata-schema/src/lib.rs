//! Declarative object schemas.
//!
//! A [`Definition`] maps field names to a bare type name or a descriptor with
//! modifiers (`default`, `required`, `primaryKey`, `validate`, `of`, nested
//! fields). [`Schema`] normalizes it once into an immutable tree of
//! [`Property`] values, then [`Schema::create`] validates candidate objects
//! and builds fresh instances from them.
//!
//! ```ignore
//! let schema = Schema::from_json(
//!     &json!({"name": {"type": "String", "required": true}, "age": "Number"}),
//!     &ValidatorRegistry::new(),
//! )?;
//! let instance = schema.create(&Value::from(json!({"name": "Ada", "extra": 1})))?;
//! ```
//!
//! # Key Types
//!
//! - [`Definition`] / [`Descriptor`] / [`FieldDef`] -- authored schema input
//! - [`Schema`] -- compiled schema and the `create` entry point
//! - [`Property`] -- normalized field descriptor with a root-anchored path
//! - [`ValidatorRegistry`] -- named predicates for JSON definitions
//! - [`SchemaConfig`] -- construction-time options
//! - [`path`] -- dotted path reads and writes over [`Value`]s
//!
//! [`Value`]: schemata_types::Value

pub mod config;
pub mod definition;
pub mod error;
pub mod path;
pub mod property;
pub mod schema;
pub mod validator;

pub use config::{ArrayErrorStyle, SchemaConfig};
pub use definition::{Definition, Descriptor, FieldDef, ValidatorSpec, RESERVED_KEYS};
pub use error::{
    ConstructionError, PathError, SchemaResult, ValidationError, ValidationErrorKind,
    ValidationResult,
};
pub use property::Property;
pub use schema::Schema;
pub use validator::{Validator, ValidatorRegistry};
