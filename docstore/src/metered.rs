use crate::error::StoreError;
use crate::metrics_defs::{STORE_REQUEST_DURATION, STORE_REQUEST_ERRORS};
use crate::store::DocumentStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::{counter, histogram};
use std::future::Future;
use std::time::Instant;

/// Records latency and failures of every operation on the wrapped store.
pub struct MeteredStore<S> {
    inner: S,
}

impl<S: DocumentStore> MeteredStore<S> {
    pub fn new(inner: S) -> Self {
        MeteredStore { inner }
    }
}

async fn observe<T>(
    operation: &'static str,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    let start = Instant::now();
    let result = call.await;

    histogram!(STORE_REQUEST_DURATION, "operation" => operation)
        .record(start.elapsed().as_secs_f64());
    if result.is_err() {
        counter!(STORE_REQUEST_ERRORS, "operation" => operation).increment(1);
    }

    result
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for MeteredStore<S> {
    async fn push(&self, path: &str, value: &Value) -> Result<String, StoreError> {
        observe("push", self.inner.push(path, value)).await
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        observe("get", self.inner.get(path)).await
    }

    async fn update(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError> {
        observe("update", self.inner.update(path, fields)).await
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        observe("delete", self.inner.delete(path)).await
    }
}
