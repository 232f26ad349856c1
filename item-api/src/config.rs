use axum::http::HeaderValue;
use docstore::config::StoreConfig;
use docstore::path::validate_key;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("API and admin listeners cannot share {0}")]
    ListenerConflict(String),

    #[error("Invalid collection name: {0:?}")]
    InvalidCollection(String),

    #[error("Invalid CORS origin: {0:?}")]
    InvalidOrigin(String),

    #[error("Wildcard CORS origin is not allowed, list the origins explicitly")]
    WildcardOrigin,
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Listener {
    pub fn api_default() -> Self {
        Listener {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }

    pub fn admin_default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 8081,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }

    fn is_unspecified(&self) -> bool {
        matches!(self.host.as_str(), "0.0.0.0" | "::" | "[::]")
    }

    /// Whether binding both listeners would collide. An unspecified host takes
    /// the port on every interface.
    pub fn overlaps(&self, other: &Listener) -> bool {
        self.port == other.port
            && (self.host == other.host || self.is_unspecified() || other.is_unspecified())
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser, e.g. "https://app.example.com".
    /// Empty disables cross-origin access.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn origins(&self) -> Result<Vec<HeaderValue>, ValidationError> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                if origin == "*" {
                    return Err(ValidationError::WildcardOrigin);
                }
                HeaderValue::from_str(origin)
                    .map_err(|_| ValidationError::InvalidOrigin(origin.clone()))
            })
            .collect()
    }
}

fn default_collection() -> String {
    "items".into()
}

/// Item API configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for the item endpoints
    #[serde(default = "Listener::api_default")]
    pub listener: Listener,
    /// Listener for health and readiness probes
    #[serde(default = "Listener::admin_default")]
    pub admin_listener: Listener,
    /// Store path the items live under
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub cors: CorsConfig,
    pub store: StoreConfig,
}

impl Config {
    pub fn new(store: StoreConfig) -> Self {
        Config {
            listener: Listener::api_default(),
            admin_listener: Listener::admin_default(),
            collection: default_collection(),
            cors: CorsConfig::default(),
            store,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        if self.listener.overlaps(&self.admin_listener) {
            return Err(ValidationError::ListenerConflict(self.listener.addr()));
        }

        if validate_key(&self.collection).is_err() {
            return Err(ValidationError::InvalidCollection(self.collection.clone()));
        }

        self.cors.origins()?;
        Ok(())
    }
}
