use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("invalid key {0:?}: keys must be non-empty, at most 768 bytes and must not contain '.', '$', '#', '[', ']', '/' or control characters")]
    InvalidKey(String),

    #[error("store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("store responded with {status}: {message}")]
    Backend { status: StatusCode, message: String },

    #[error("unexpected store response: {0}")]
    UnexpectedResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("could not generate key: {0}")]
    KeyGeneration(#[from] getrandom::Error),

    #[error("unsupported store url {0:?}: expected an absolute http(s) url")]
    InvalidUrl(String),
}

impl StoreError {
    /// True when the caller supplied something that can never address the store,
    /// as opposed to the store failing to serve a well-formed request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::InvalidKey(_))
    }
}
