use crate::config::{CorsConfig, ValidationError};
use crate::errors::ApiError;
use crate::item::{Item, ItemFields};
use crate::metrics_defs::ITEM_REQUESTS;
use crate::service::ItemService;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode, header::CONTENT_TYPE},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use shared::counter;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize, Debug)]
struct ItemParams {
    #[serde(rename = "itemID")]
    item_id: Option<String>,
}

impl ItemParams {
    fn item_id(&self) -> Result<&str, ApiError> {
        match self.item_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ApiError::MissingItemId),
        }
    }
}

pub fn router(service: ItemService, cors: CorsLayer) -> Router {
    Router::new()
        .route("/create", post(create_item))
        .route("/read", get(read_items))
        .route("/update", put(update_item))
        .route("/delete", delete(delete_item))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ValidationError> {
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.origins()?))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]))
}

pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

fn record<T>(operation: &'static str, result: &Result<T, ApiError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    counter!(ITEM_REQUESTS, "operation" => operation, "outcome" => outcome).increment(1);
}

async fn create_item(
    State(service): State<ItemService>,
    body: Bytes,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let result = async {
        let fields = ItemFields::from_json(&body)?;
        service.create(fields).await
    }
    .await;

    record("create", &result);
    result.map(|item| (StatusCode::CREATED, Json(item)))
}

async fn read_items(State(service): State<ItemService>) -> Result<Json<Vec<Item>>, ApiError> {
    let result = service.list().await;

    record("read", &result);
    result.map(Json)
}

async fn update_item(
    State(service): State<ItemService>,
    Query(params): Query<ItemParams>,
    body: Bytes,
) -> Result<String, ApiError> {
    let result = async {
        let id = params.item_id()?;
        let fields = ItemFields::from_json(&body)?;
        service.update(id, fields).await?;
        Ok::<_, ApiError>(format!("Item with ID {id} updated successfully"))
    }
    .await;

    record("update", &result);
    result
}

async fn delete_item(
    State(service): State<ItemService>,
    Query(params): Query<ItemParams>,
) -> Result<String, ApiError> {
    let result = async {
        let id = params.item_id()?;
        service.delete(id).await?;
        Ok::<_, ApiError>(format!("Item with ID {id} deleted successfully"))
    }
    .await;

    record("delete", &result);
    result
}
