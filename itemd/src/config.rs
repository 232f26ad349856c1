use docstore::config::StoreConfig;
use item_api::config::Config as ItemApiConfig;
use serde::Deserialize;
use std::fs::File;

pub const PORT_ENV: &str = "PORT";
pub const STORE_AUTH_TOKEN_ENV: &str = "ITEMD_STORE_AUTH_TOKEN";

fn default_prefix() -> String {
    "itemd".into()
}

#[derive(Deserialize, Debug)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_level() -> String {
    "info".into()
}

#[derive(Deserialize, Debug)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,
    pub sentry_dsn: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub logging: Option<LoggingConfig>,
    pub metrics: Option<MetricsConfig>,
    pub api: ItemApiConfig,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Lets the deployment environment override the file: `PORT` replaces the API
    /// port and `ITEMD_STORE_AUTH_TOKEN` the realtime database token.
    ///
    /// Returns the variables that were set but have nothing to override. This
    /// runs before logging is up, so reporting them is left to the caller.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<Vec<&'static str>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV).filter(|p| !p.is_empty()) {
            self.api.listener.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                name: PORT_ENV,
                value: port,
            })?;
        }

        let mut ignored = Vec::new();
        if let Some(token) = lookup(STORE_AUTH_TOKEN_ENV).filter(|t| !t.is_empty()) {
            match &mut self.api.store {
                StoreConfig::RealtimeDb(db) => db.auth_token = Some(token),
                StoreConfig::Memory => ignored.push(STORE_AUTH_TOKEN_ENV),
            }
        }

        Ok(ignored)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid value {value:?} for environment variable {name}")]
    InvalidEnv { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_example_config() {
        let tmp = write_tmp_file(include_str!("../itemd.example.yaml"));
        let config = Config::from_file(tmp.path()).expect("load config");

        assert!(config.api.validate().is_ok());
        assert_eq!(config.api.listener.port, 8080);
        assert_eq!(config.logging.expect("logging config").level, "info");
        assert!(config.metrics.is_none());
    }

    #[test]
    fn test_minimal_config() {
        let tmp = write_tmp_file(
            r#"
            api:
                store:
                    type: memory
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            "#,
        );
        let config = Config::from_file(tmp.path()).expect("load config");
        assert_eq!(config.api.store, StoreConfig::Memory);
        assert_eq!(config.metrics.expect("metrics config").prefix, "itemd");
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let tmp = write_tmp_file(include_str!("../itemd.example.yaml"));
        let mut config = Config::from_file(tmp.path()).expect("load config");

        let ignored = config
            .apply_env(env(&[("PORT", "9090"), ("ITEMD_STORE_AUTH_TOKEN", "secret")]))
            .expect("apply env");
        assert!(ignored.is_empty());

        assert_eq!(config.api.listener.port, 9090);
        let StoreConfig::RealtimeDb(db) = &config.api.store else {
            panic!("expected realtime_db store");
        };
        assert_eq!(db.auth_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_empty_port_keeps_configured_value() {
        let tmp = write_tmp_file(include_str!("../itemd.example.yaml"));
        let mut config = Config::from_file(tmp.path()).expect("load config");

        config.apply_env(env(&[("PORT", "")])).expect("apply env");
        assert_eq!(config.api.listener.port, 8080);
    }

    #[test]
    fn test_token_ignored_for_memory_store() {
        let tmp = write_tmp_file("api: {store: {type: memory}}");
        let mut config = Config::from_file(tmp.path()).expect("load config");

        let ignored = config
            .apply_env(env(&[("ITEMD_STORE_AUTH_TOKEN", "secret")]))
            .expect("apply env");
        assert_eq!(ignored, vec![STORE_AUTH_TOKEN_ENV]);
        assert_eq!(config.api.store, StoreConfig::Memory);
    }

    #[test]
    fn test_invalid_port() {
        let tmp = write_tmp_file("api: {store: {type: memory}}");
        let mut config = Config::from_file(tmp.path()).expect("load config");

        let err = config.apply_env(env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: "PORT", .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(std::path::Path::new("/nonexistent/itemd.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
