use crate::item::ItemFields;
use async_trait::async_trait;
use docstore::memory::MemoryStore;
use docstore::{DocumentStore, StoreError};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn fields(name: &str, phone: i64, address: &str) -> ItemFields {
    ItemFields {
        name: name.into(),
        phone,
        address: address.into(),
    }
}

/// Memory store that counts how often it was called.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn push(&self, path: &str, value: &Value) -> Result<String, StoreError> {
        self.hit();
        self.inner.push(path, value).await
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.hit();
        self.inner.get(path).await
    }

    async fn update(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError> {
        self.hit();
        self.inner.update(path, fields).await
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.hit();
        self.inner.delete(path).await
    }
}

/// A store whose backend is always down.
pub struct FailingStore;

fn backend_down() -> StoreError {
    StoreError::UnexpectedResponse("backend down".into())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn push(&self, _path: &str, _value: &Value) -> Result<String, StoreError> {
        Err(backend_down())
    }

    async fn get(&self, _path: &str) -> Result<Option<Value>, StoreError> {
        Err(backend_down())
    }

    async fn update(&self, _path: &str, _fields: &Map<String, Value>) -> Result<(), StoreError> {
        Err(backend_down())
    }

    async fn delete(&self, _path: &str) -> Result<(), StoreError> {
        Err(backend_down())
    }
}
