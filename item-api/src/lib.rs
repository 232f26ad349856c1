pub mod api;
pub mod config;
pub mod errors;
pub mod item;
pub mod metrics_defs;
pub mod service;

#[cfg(test)]
mod testutils;

use service::ItemService;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::net::TcpListener;

#[derive(thiserror::Error, Debug)]
pub enum ItemApiError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ValidationError),
    #[error("could not set up store: {0}")]
    Store(#[from] docstore::StoreError),
}

/// Serves the item API and the admin probes until `shutdown` resolves.
pub async fn run<F>(config: config::Config, shutdown: F) -> Result<(), ItemApiError>
where
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;

    let store = docstore::get_store(&config.store)?;
    let service = ItemService::new(store, config.collection.clone());
    let app = api::router(service, api::cors_layer(&config.cors)?);

    let admin_listener = TcpListener::bind(config.admin_listener.addr()).await?;
    let listener = TcpListener::bind(config.listener.addr()).await?;

    let ready = Arc::new(AtomicBool::new(false));
    let ready_probe = ready.clone();
    tracing::info!(addr = %admin_listener.local_addr()?, "admin listener bound");
    let admin_task = tokio::spawn(run_http_service(
        admin_listener,
        AdminService::new(move || ready_probe.load(Ordering::Relaxed)),
    ));

    tracing::info!(
        addr = %listener.local_addr()?,
        collection = %config.collection,
        "item api listening"
    );
    ready.store(true, Ordering::Relaxed);

    let result = api::serve(listener, app, shutdown).await;

    ready.store(false, Ordering::Relaxed);
    admin_task.abort();
    tracing::info!("item api stopped");

    Ok(result?)
}
