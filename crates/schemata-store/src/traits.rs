use async_trait::async_trait;
use schemata_types::Value;

use crate::error::StoreResult;
use crate::query::Query;

/// Which model operation a write comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteOp {
    /// The key must not hold an entry yet.
    Create,
    /// The key must already hold an entry, which is replaced.
    Update,
}

impl WriteOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

/// Persistence contract for validated instances.
///
/// Entries are grouped by model name and addressed by primary-key value.
/// Implementations never validate: everything passed to
/// [`set_entry`](Store::set_entry) has already been through
/// `Schema::create`.
pub trait Store: Send + Sync {
    /// Read an entry. Returns `Ok(None)` if the key holds nothing.
    fn get_entry(&self, model: &str, key: &str) -> StoreResult<Option<Value>>;

    /// Write an entry.
    ///
    /// `Create` on an occupied key fails with `StoreError::AlreadyExists`;
    /// `Update` on an empty key fails with `StoreError::NotFound`.
    fn set_entry(&self, model: &str, key: &str, instance: &Value, op: WriteOp) -> StoreResult<()>;

    /// Delete an entry. Returns `true` if it existed.
    fn delete_entry(&self, model: &str, key: &str) -> StoreResult<bool>;

    /// All entries of `model` matching `query`.
    fn filter_entry(&self, model: &str, query: &Query) -> StoreResult<Vec<Value>>;
}

/// Async face of a [`Store`], used by models.
///
/// Every [`Store`] gets this for free; backends with real I/O implement it
/// directly instead.
#[async_trait]
pub trait AsyncStore: Send + Sync {
    async fn get(&self, model: &str, key: &str) -> StoreResult<Option<Value>>;
    async fn set(&self, model: &str, key: &str, instance: &Value, op: WriteOp) -> StoreResult<()>;
    async fn delete(&self, model: &str, key: &str) -> StoreResult<bool>;
    async fn filter(&self, model: &str, query: &Query) -> StoreResult<Vec<Value>>;
}

#[async_trait]
impl<T: Store + ?Sized> AsyncStore for T {
    async fn get(&self, model: &str, key: &str) -> StoreResult<Option<Value>> {
        self.get_entry(model, key)
    }

    async fn set(&self, model: &str, key: &str, instance: &Value, op: WriteOp) -> StoreResult<()> {
        self.set_entry(model, key, instance, op)
    }

    async fn delete(&self, model: &str, key: &str) -> StoreResult<bool> {
        self.delete_entry(model, key)
    }

    async fn filter(&self, model: &str, query: &Query) -> StoreResult<Vec<Value>> {
        self.filter_entry(model, query)
    }
}
