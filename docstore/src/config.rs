use serde::Deserialize;
use std::fmt;
use url::Url;

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

#[derive(Clone, Deserialize, PartialEq)]
pub struct RealtimeDbConfig {
    /// Base url of the database, e.g. `https://<project>-default-rtdb.firebaseio.com/`
    pub url: Url,
    /// Sent as the `auth` query parameter on every request when set.
    pub auth_token: Option<String>,
    /// Applies to the whole request, including reading the response body.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl RealtimeDbConfig {
    pub fn new(url: Url) -> Self {
        RealtimeDbConfig {
            url,
            auth_token: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for RealtimeDbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeDbConfig")
            .field("url", &self.url.as_str())
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum StoreConfig {
    RealtimeDb(RealtimeDbConfig),
    /// Keeps everything in process memory. Data is lost on restart.
    Memory,
}
