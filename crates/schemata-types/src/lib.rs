//! Foundation types for schemata.
//!
//! This crate provides the value and type vocabulary shared by every other
//! schemata crate. Candidate objects, defaults and validated instances are all
//! [`Value`]s; the set of types a schema may declare is the closed [`Kind`]
//! enum.
//!
//! # Key Types
//!
//! - [`Value`] -- In-memory document value (JSON-like, plus native dates)
//! - [`Map`] -- Ordered field map backing [`Value::Object`]
//! - [`Kind`] -- Supported field types with runtime-tag matching
//! - [`TypeError`] -- Errors from parsing kinds

pub mod error;
pub mod kind;
pub mod value;

pub use error::TypeError;
pub use kind::Kind;
pub use value::{Map, Value};
