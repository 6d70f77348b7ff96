//! The registry forwards each operation to the store hooks under the model's
//! name, with the validated instance and the right write kind.

use std::sync::Mutex;

use schemata_model::Registry;
use schemata_schema::Definition;
use schemata_store::{Query, Store, StoreResult, WriteOp};
use schemata_types::Value;
use serde_json::json;

#[derive(Debug, PartialEq)]
enum Call {
    Get(String, String),
    Set(String, String, Value, WriteOp),
    Delete(String, String),
    Filter(String, Query),
}

/// Records every hook call and pretends every key holds an entry.
#[derive(Default)]
struct Recording {
    calls: Mutex<Vec<Call>>,
}

impl Recording {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

impl Store for Recording {
    fn get_entry(&self, model: &str, key: &str) -> StoreResult<Option<Value>> {
        self.record(Call::Get(model.into(), key.into()));
        Ok(Some(Value::from(json!({"pk": key}))))
    }

    fn set_entry(&self, model: &str, key: &str, instance: &Value, op: WriteOp) -> StoreResult<()> {
        self.record(Call::Set(model.into(), key.into(), instance.clone(), op));
        Ok(())
    }

    fn delete_entry(&self, model: &str, key: &str) -> StoreResult<bool> {
        self.record(Call::Delete(model.into(), key.into()));
        Ok(true)
    }

    fn filter_entry(&self, model: &str, query: &Query) -> StoreResult<Vec<Value>> {
        self.record(Call::Filter(model.into(), query.clone()));
        Ok(vec![Value::object(), Value::object()])
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.define("myModel", &Definition::new()).unwrap();
    registry
}

fn fake() -> Value {
    Value::from(json!({"pk": "1234"}))
}

#[tokio::test]
async fn get_calls_get_entry() {
    let store = Recording::default();
    registry().get("myModel", "1234", &store).await.unwrap();
    assert_eq!(store.take(), vec![Call::Get("myModel".into(), "1234".into())]);
}

#[tokio::test]
async fn filter_calls_filter_entry() {
    let store = Recording::default();
    let query = Query::new().where_eq("fieldA", 1);
    let found = registry().filter("myModel", &query, &store).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(store.take(), vec![Call::Filter("myModel".into(), query)]);
}

#[tokio::test]
async fn create_calls_set_entry_with_create() {
    let store = Recording::default();
    registry().create("myModel", &fake(), &store).await.unwrap();
    assert_eq!(
        store.take(),
        vec![Call::Set("myModel".into(), "1234".into(), fake(), WriteOp::Create)]
    );
}

#[tokio::test]
async fn update_checks_existence_then_sets_with_update() {
    let store = Recording::default();
    registry().update("myModel", &fake(), &store).await.unwrap();
    assert_eq!(
        store.take(),
        vec![
            Call::Get("myModel".into(), "1234".into()),
            Call::Set("myModel".into(), "1234".into(), fake(), WriteOp::Update),
        ]
    );
}

#[tokio::test]
async fn delete_calls_delete_entry() {
    let store = Recording::default();
    assert!(registry().delete("myModel", "1234", &store).await.unwrap());
    assert_eq!(store.take(), vec![Call::Delete("myModel".into(), "1234".into())]);
}

#[tokio::test]
async fn unknown_model_never_reaches_the_store() {
    let store = Recording::default();
    let err = registry().delete("other", "1234", &store).await.unwrap_err();
    assert_eq!(err.to_string(), "Model other is not defined");
    assert!(store.take().is_empty());
}
