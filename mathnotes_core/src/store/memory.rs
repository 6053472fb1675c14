use std::cell::{Cell, RefCell};

use serde_json::Value;
use tracing::debug;

use super::{Collection, Entity, StoreApi, StoreError};
use crate::data::Catalog;

/// A request as it was received by a [`MemoryStore`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Request {
    List(Collection),
    Create(Collection, u64),
    Delete(Collection, u64),
}

/// A backing store that keeps both collections in memory as JSON records,
/// the way json-server keeps its database file.
///
/// Failures can be switched on to simulate an unhealthy service; every request
/// is recorded, including the ones that fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    categories: RefCell<Vec<Value>>,
    formulas: RefCell<Vec<Value>>,
    fail_reads: Cell<bool>,
    /// A single collection whose reads fail, independently of `fail_reads`.
    fail_reads_of: Cell<Option<Collection>>,
    fail_writes: Cell<bool>,
    requests: RefCell<Vec<Request>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Creates a store whose collections hold the records of `catalog`.
    pub fn with_catalog(catalog: &Catalog) -> Self {
        let store = MemoryStore::new();
        store.replace(catalog);
        store
    }

    /// Replaces the contents of both collections, bypassing the request log.
    /// This is how tests change the store behind a client's back.
    pub fn replace(&self, catalog: &Catalog) {
        *self.categories.borrow_mut() = to_records(&catalog.categories);
        *self.formulas.borrow_mut() = to_records(&catalog.formulas);
    }

    /// The current contents of the store.
    pub fn snapshot(&self) -> Result<Catalog, StoreError> {
        Ok(Catalog::new(
            from_records(Collection::Categories, &self.categories.borrow())?,
            from_records(Collection::Formulas, &self.formulas.borrow())?,
        ))
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Makes reads of only the given collection fail, or none with `None`.
    pub fn set_fail_reads_of(&self, collection: Option<Collection>) {
        self.fail_reads_of.set(collection);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    fn records(&self, collection: Collection) -> &RefCell<Vec<Value>> {
        match collection {
            Collection::Categories => &self.categories,
            Collection::Formulas => &self.formulas,
        }
    }

    fn check_write(&self, collection: Collection) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::RequestFailed { collection, status: 500 });
        }
        Ok(())
    }
}

impl StoreApi for MemoryStore {
    async fn list<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        let collection = E::COLLECTION;
        self.requests.borrow_mut().push(Request::List(collection));
        if self.fail_reads.get() || self.fail_reads_of.get() == Some(collection) {
            return Err(StoreError::FetchFailed { collection, status: 500 });
        }
        from_records(collection, &self.records(collection).borrow())
    }

    async fn create<E: Entity>(&self, entity: &E) -> Result<(), StoreError> {
        let collection = E::COLLECTION;
        let id = entity.raw_id();
        self.requests.borrow_mut().push(Request::Create(collection, id));
        self.check_write(collection)?;
        let record = serde_json::to_value(entity)
            .map_err(|source| StoreError::Decode { collection, source })?;
        self.records(collection).borrow_mut().push(record);
        debug!(%collection, id, "stored record");
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: u64) -> Result<(), StoreError> {
        self.requests.borrow_mut().push(Request::Delete(collection, id));
        self.check_write(collection)?;
        let mut records = self.records(collection).borrow_mut();
        let index = records
            .iter()
            .position(|record| record_id(record) == Some(id))
            .ok_or(StoreError::NotFound { collection, id })?;
        records.remove(index);
        debug!(%collection, id, "removed record");
        Ok(())
    }
}

fn to_records<E: Entity>(entities: &[E]) -> Vec<Value> {
    // entities are plain records, so they always serialize
    entities.iter().filter_map(|entity| serde_json::to_value(entity).ok()).collect()
}

fn from_records<E: Entity>(collection: Collection, records: &[Value]) -> Result<Vec<E>, StoreError> {
    records
        .iter()
        .map(|record| {
            serde_json::from_value(record.clone())
                .map_err(|source| StoreError::Decode { collection, source })
        })
        .collect()
}

fn record_id(record: &Value) -> Option<u64> {
    match record.get("id")? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}
