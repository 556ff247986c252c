//! Configuration module for postr
//!
//! Settings come from `<config dir>/postr/config.toml` layered with `POSTR_*`
//! environment variables. A missing file is not an error; defaults apply.
//! Configuration is only ever read.

use crate::client::{DEFAULT_ENDPOINT, FetchError, HttpSearchClient};
use crate::query::DEFAULT_PAGE_SIZE;
use crate::session::SessionSettings;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const ENV_PREFIX: &str = "POSTR";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const fn default_debounce_ms() -> u64 {
    250
}

const fn default_request_timeout_secs() -> u64 {
    10
}

fn default_log_filter() -> String {
    "postr=info".to_string()
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PostrConfig {
    /// Search endpoint receiving `q`, `skip` and `limit`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Records per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Delay before a text change triggers a fetch
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for PostrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            log_filter: default_log_filter(),
        }
    }
}

impl PostrConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("postr").join("config.toml"))
    }

    /// Load configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed, or the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path` plus `POSTR_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be parsed or the result fails
    /// validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot be used
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero page size, a zero timeout, or an
    /// endpoint that is not an absolute URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Message("page_size must be greater than zero".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::Message(format!("Invalid endpoint '{}': {e}", self.endpoint)))?;
        Ok(())
    }

    /// Session tunables derived from this configuration
    #[must_use]
    pub const fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            page_size: self.page_size,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }

    /// HTTP search client for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the endpoint is invalid or the client cannot
    /// be built.
    pub fn search_client(&self) -> Result<HttpSearchClient, FetchError> {
        HttpSearchClient::new(&self.endpoint, Duration::from_secs(self.request_timeout_secs))
    }
}
