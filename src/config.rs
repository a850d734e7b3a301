//! # Configuration
//!
//! Startup settings for a [`PersistenceSystem`](crate::lifecycle::PersistenceSystem):
//! credentials, the endpoint, and the default request options new collections
//! start from. Read from JSON; any field may be omitted and falls back to its
//! default. `PERSISTENCE_*` environment variables override the file.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::model::QuerySpec;

pub const DEFAULT_ENDPOINT_URI: &str = "https://api.usergrid.com";

const ENV_ORG_NAME: &str = "PERSISTENCE_ORG_NAME";
const ENV_APP_NAME: &str = "PERSISTENCE_APP_NAME";
const ENV_USERNAME: &str = "PERSISTENCE_USERNAME";
const ENV_PASSWORD: &str = "PERSISTENCE_PASSWORD";
const ENV_ENDPOINT_URI: &str = "PERSISTENCE_ENDPOINT_URI";
const ENV_PAGE_LIMIT: &str = "PERSISTENCE_PAGE_LIMIT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Organization, application and user the system signs in with.
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Credentials {
    pub org_name: String,
    pub app_name: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("org_name", &self.org_name)
            .field("app_name", &self.app_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistenceConfig {
    pub credentials: Credentials,
    #[serde(rename = "URI")]
    pub endpoint_uri: String,
    pub monitoring_enabled: bool,
    /// Starting point for every collection's query options.
    pub request_options: QuerySpec,
    /// Capacity of the in-memory store's request channel.
    pub store_buffer_size: usize,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            endpoint_uri: DEFAULT_ENDPOINT_URI.to_owned(),
            monitoring_enabled: false,
            request_options: QuerySpec::default(),
            store_buffer_size: 32,
        }
    }
}

impl PersistenceConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Applies `PERSISTENCE_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides resolved through `lookup`, keyed by environment variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ORG_NAME) {
            self.credentials.org_name = value;
        }
        if let Some(value) = lookup(ENV_APP_NAME) {
            self.credentials.app_name = value;
        }
        if let Some(value) = lookup(ENV_USERNAME) {
            self.credentials.username = value;
        }
        if let Some(value) = lookup(ENV_PASSWORD) {
            self.credentials.password = value;
        }
        if let Some(value) = lookup(ENV_ENDPOINT_URI) {
            self.endpoint_uri = value;
        }
        if let Some(value) = lookup(ENV_PAGE_LIMIT) {
            self.request_options.limit = match value.trim().parse() {
                Ok(limit) => limit,
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_PAGE_LIMIT,
                        value,
                    })
                }
            };
        }
        Ok(self)
    }
}
