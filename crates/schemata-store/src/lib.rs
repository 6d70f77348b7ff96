//! Persistence for schemata models.
//!
//! Models validate instances with a schema and hand them to a [`Store`],
//! which keeps them grouped by model name and keyed by primary-key value.
//! The store never interprets or validates what it holds.
//!
//! # Key Types
//!
//! - [`Store`] -- synchronous persistence hooks (get / set / delete / filter)
//! - [`AsyncStore`] -- async face used by models, implemented for every [`Store`]
//! - [`WriteOp`] -- whether a write creates or updates
//! - [`Query`] -- exact-match filter over dotted paths
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding

pub mod error;
pub mod memory;
pub mod query;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use query::Query;
pub use traits::{AsyncStore, Store, WriteOp};
