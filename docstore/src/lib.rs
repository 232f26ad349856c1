//! Client side of the remote JSON document store.
//!
//! `DocumentStore` is the seam the API handlers depend on. `RealtimeDbStore`
//! talks to a Realtime Database over REST, `MemoryStore` keeps the tree in
//! process for local runs and tests.
pub mod config;
pub mod error;
pub mod memory;
pub mod metered;
pub mod metrics_defs;
pub mod path;
pub mod push_id;
pub mod realtime_db;
pub mod store;

#[cfg(test)]
mod testutils;

pub use error::StoreError;
pub use store::DocumentStore;

use config::StoreConfig;
use memory::MemoryStore;
use metered::MeteredStore;
use realtime_db::RealtimeDbStore;
use std::sync::Arc;

/// Builds the configured store, wrapped so every call is metered.
pub fn get_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let store: Arc<dyn DocumentStore> = match config {
        StoreConfig::RealtimeDb(db) => {
            tracing::info!(url = %db.url, "using realtime database store");
            Arc::new(MeteredStore::new(RealtimeDbStore::new(db)?))
        }
        StoreConfig::Memory => {
            tracing::warn!("using the in-memory store, data will not survive a restart");
            Arc::new(MeteredStore::new(MemoryStore::new()))
        }
    };
    Ok(store)
}
