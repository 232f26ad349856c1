//! In-process stand-in for the Realtime Database REST surface, backed by a
//! `MemoryStore`.
use crate::memory::MemoryStore;
use crate::store::DocumentStore;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

#[derive(Clone)]
struct MockState {
    store: Arc<MemoryStore>,
    auth_token: Option<String>,
    requests: Arc<AtomicUsize>,
}

pub struct MockRealtimeDb {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl MockRealtimeDb {
    pub async fn spawn(auth_token: Option<&str>) -> Self {
        let requests = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            store: Arc::new(MemoryStore::new()),
            auth_token: auth_token.map(String::from),
            requests: requests.clone(),
        };

        let app = Router::new().fallback(handle).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockRealtimeDb {
            addr,
            requests,
            handle,
        }
    }

    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).unwrap()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockRealtimeDb {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if let Some(expected) = &state.auth_token
        && params.get("auth") != Some(expected)
    {
        return error(StatusCode::UNAUTHORIZED, "Permission denied");
    }

    let Some(path) = uri.path().strip_suffix(".json") else {
        return error(StatusCode::BAD_REQUEST, "Invalid path");
    };

    let parse_body = || serde_json::from_slice::<Value>(&body);

    let result = match method {
        Method::GET => state.store.get(path).await.map(|v| v.unwrap_or(Value::Null)),
        Method::POST => match parse_body() {
            Ok(value) => state
                .store
                .push(path, &value)
                .await
                .map(|key| json!({ "name": key })),
            Err(_) => return error(StatusCode::BAD_REQUEST, "Invalid data; couldn't parse JSON object"),
        },
        Method::PATCH => match parse_body() {
            Ok(Value::Object(fields)) => state
                .store
                .update(path, &fields)
                .await
                .map(|_| Value::Object(fields)),
            _ => return error(StatusCode::BAD_REQUEST, "Invalid data; couldn't parse JSON object"),
        },
        Method::DELETE => state.store.delete(path).await.map(|_| Value::Null),
        _ => return error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
    };

    match result {
        Ok(value) => Json(value).into_response(),
        Err(e) => error(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}
