use crate::errors::ApiError;
use crate::item::{Item, ItemFields};
use crate::metrics_defs::ITEMS_READ_SKIPPED;
use docstore::{DocumentStore, StoreError, path};
use serde_json::Value;
use shared::counter;
use std::sync::Arc;

/// Item lifecycle on top of a document store.
///
/// Items live as `<collection>/<id>` documents. The service holds no item state
/// of its own; every call goes to the store.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn DocumentStore>,
    collection: Arc<str>,
}

impl ItemService {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        ItemService {
            store,
            collection: collection.into().into(),
        }
    }

    /// Stores `fields` under a store-generated key and returns the item with that key as id.
    pub async fn create(&self, fields: ItemFields) -> Result<Item, ApiError> {
        let document = Value::Object(fields.to_document());
        let id = self.store.push(&self.collection, &document).await?;

        tracing::debug!(id = %id, "item created");
        Ok(Item { id, fields })
    }

    /// Every stored item, each carrying the key it is stored under. Order is unspecified.
    pub async fn list(&self) -> Result<Vec<Item>, ApiError> {
        let entries = match self.store.get(&self.collection).await? {
            None => return Ok(Vec::new()),
            Some(Value::Object(entries)) => entries,
            Some(_) => {
                return Err(StoreError::UnexpectedResponse(format!(
                    "collection {:?} is not an object",
                    &*self.collection
                ))
                .into());
            }
        };

        let mut items = Vec::with_capacity(entries.len());
        for (id, document) in entries {
            match ItemFields::from_stored(document) {
                Ok(fields) => items.push(Item { id, fields }),
                Err(e) => {
                    counter!(ITEMS_READ_SKIPPED).increment(1);
                    tracing::warn!(id = %id, error = %e, "skipping stored item that cannot be decoded");
                }
            }
        }

        Ok(items)
    }

    /// Replaces the three item fields at `id`, leaving anything else stored there alone.
    ///
    /// Fails with `NotFound` if nothing is stored at `id`. The existence check and
    /// the merge are separate store calls.
    pub async fn update(&self, id: &str, fields: ItemFields) -> Result<(), ApiError> {
        let path = self.item_path(id)?;

        if self.store.get(&path).await?.is_none() {
            return Err(ApiError::NotFound(id.to_string()));
        }

        self.store.update(&path, &fields.to_document()).await?;

        tracing::debug!(id = %id, "item updated");
        Ok(())
    }

    /// Removes the item at `id`. Deleting an id that does not exist succeeds.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = self.item_path(id)?;
        self.store.delete(&path).await?;

        tracing::debug!(id = %id, "item deleted");
        Ok(())
    }

    fn item_path(&self, id: &str) -> Result<String, ApiError> {
        if id.is_empty() {
            return Err(ApiError::MissingItemId);
        }
        Ok(path::child(&self.collection, id)?)
    }
}
