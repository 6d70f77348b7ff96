use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use schemata_types::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::query::Query;
use crate::traits::{Store, WriteOp};

type Entries = HashMap<String, HashMap<String, Value>>;

/// In-memory, HashMap-based store.
///
/// Intended for tests and embedding. Entries are grouped per model behind a
/// single `RwLock` and cloned on read and write.
pub struct InMemoryStore {
    entries: RwLock<Entries>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn read_entries(&self) -> StoreResult<RwLockReadGuard<'_, Entries>> {
        self.entries
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))
    }

    fn write_entries(&self) -> StoreResult<RwLockWriteGuard<'_, Entries>> {
        self.entries
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))
    }

    /// Number of entries stored for `model`.
    pub fn len(&self, model: &str) -> StoreResult<usize> {
        let map = self.read_entries()?;
        Ok(map.get(model).map_or(0, HashMap::len))
    }

    /// Returns `true` if no model holds any entry.
    pub fn is_empty(&self) -> StoreResult<bool> {
        let map = self.read_entries()?;
        Ok(map.values().all(HashMap::is_empty))
    }

    /// Sorted keys of every entry stored for `model`.
    pub fn keys(&self, model: &str) -> StoreResult<Vec<String>> {
        let map = self.read_entries()?;
        let mut keys: Vec<String> = map
            .get(model)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }

    /// Remove every entry of every model.
    pub fn clear(&self) -> StoreResult<()> {
        self.write_entries()?.clear();
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for InMemoryStore {
    fn get_entry(&self, model: &str, key: &str) -> StoreResult<Option<Value>> {
        let map = self.read_entries()?;
        Ok(map.get(model).and_then(|m| m.get(key)).cloned())
    }

    fn set_entry(&self, model: &str, key: &str, instance: &Value, op: WriteOp) -> StoreResult<()> {
        let mut map = self.write_entries()?;
        let entries = map.entry(model.to_string()).or_default();
        match (op, entries.contains_key(key)) {
            (WriteOp::Create, true) => {
                return Err(StoreError::AlreadyExists {
                    model: model.to_string(),
                    key: key.to_string(),
                })
            }
            (WriteOp::Update, false) => {
                return Err(StoreError::NotFound {
                    model: model.to_string(),
                    key: key.to_string(),
                })
            }
            _ => {}
        }
        entries.insert(key.to_string(), instance.clone());
        debug!(model, key, op = op.as_str(), "entry written");
        Ok(())
    }

    fn delete_entry(&self, model: &str, key: &str) -> StoreResult<bool> {
        let mut map = self.write_entries()?;
        let existed = map
            .get_mut(model)
            .is_some_and(|entries| entries.remove(key).is_some());
        if existed {
            debug!(model, key, "entry deleted");
        }
        Ok(existed)
    }

    fn filter_entry(&self, model: &str, query: &Query) -> StoreResult<Vec<Value>> {
        let map = self.read_entries()?;
        let Some(entries) = map.get(model) else {
            return Ok(Vec::new());
        };
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        Ok(keys
            .into_iter()
            .filter_map(|key| entries.get(key))
            .filter(|instance| query.matches(instance))
            .cloned()
            .collect())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let models = self.read_entries().map(|map| map.len()).unwrap_or(0);
        f.debug_struct("InMemoryStore")
            .field("model_count", &models)
            .finish()
    }
}
