use crate::config::RealtimeDbConfig;
use crate::error::StoreError;
use crate::path::{segments, validate_key};
use crate::store::DocumentStore;
use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Client for the REST surface of a Realtime Database.
///
/// Each path maps to `{base}/{path}.json`. Requests are never retried here;
/// the caller decides whether a failed operation is worth repeating.
pub struct RealtimeDbStore {
    client: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl RealtimeDbStore {
    pub fn new(config: &RealtimeDbConfig) -> Result<Self, StoreError> {
        let base_url = config.url.clone();
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(RealtimeDbStore {
            client,
            base_url,
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, StoreError> {
        let mut parts: Vec<String> = segments(path).map(str::to_string).collect();
        match parts.last_mut() {
            Some(last) => last.push_str(".json"),
            None => parts.push(".json".into()),
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&parts);

        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }

        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, StoreError> {
        for segment in segments(path) {
            validate_key(segment)?;
        }

        tracing::debug!(%method, path, "store request");

        let mut request = self.client.request(method, self.url(path)?);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(StoreError::Backend {
                status,
                message: error_message(status, &bytes),
            });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Prefers the `error` field the database puts in failure bodies.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorResponse>(body) {
        return parsed.error;
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        text.to_string()
    }
}

#[async_trait]
impl DocumentStore for RealtimeDbStore {
    async fn push(&self, path: &str, value: &Value) -> Result<String, StoreError> {
        let response = self.send(Method::POST, path, Some(value.clone())).await?;
        let key = serde_json::from_value::<PushResponse>(response)
            .map(|r| r.name)
            .map_err(|e| StoreError::UnexpectedResponse(format!("push: {e}")))?;

        if key.is_empty() {
            return Err(StoreError::UnexpectedResponse(
                "push: store returned an empty key".into(),
            ));
        }
        Ok(key)
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        match self.send(Method::GET, path, None).await? {
            Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }

    async fn update(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError> {
        // A key containing '/' would turn the merge into a multi-location write.
        for key in fields.keys() {
            validate_key(key)?;
        }

        self.send(Method::PATCH, path, Some(Value::Object(fields.clone())))
            .await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.send(Method::DELETE, path, None).await?;
        Ok(())
    }
}
