//! Models and a named model registry.
//!
//! A [`Model`] binds a compiled schema to a primary key and orchestrates
//! get / create / update / delete / filter: candidates are validated with
//! `Schema::create` and the resulting instances are handed to a store under
//! the model's name. A [`Registry`] defines models by name and dispatches
//! operations to them.
//!
//! # Key Types
//!
//! - [`Model`] -- one schema plus its primary key
//! - [`Registry`] -- models addressed by name
//! - [`ModelConfig`] -- implicit primary key and schema options, loadable from TOML
//! - [`ModelError`] -- construction, validation, store and lookup failures

pub mod config;
pub mod error;
pub mod model;
pub mod registry;

pub use config::{ModelConfig, DEFAULT_PRIMARY_KEY};
pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use registry::Registry;
