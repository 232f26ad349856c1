use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A hierarchical JSON document store addressed by `/`-separated paths.
///
/// Every operation touches a single path and is atomic at the store boundary.
/// Implementations are shared between in-flight requests and must be safe for
/// concurrent use.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes `value` under a newly generated child key of `path` and returns the key.
    async fn push(&self, path: &str, value: &Value) -> Result<String, StoreError>;

    /// Reads the subtree at `path`. `None` means nothing is stored there.
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Merges `fields` into the object at `path`, leaving other children untouched.
    /// A `null` field removes that child. The object is created if absent.
    async fn update(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError>;

    /// Removes the subtree at `path`. Removing an absent path succeeds.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}
