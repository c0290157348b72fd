//! Service settings.
//!
//! Loaded from an optional YAML file layered with `WORD_CACHE_*` environment
//! variables (`__` separates nested keys, e.g. `WORD_CACHE_UPSTREAM__API_KEY`).
//! Settings are validated once at startup so a missing credential stops the
//! process instead of failing every request.

use config::{Config, Environment, File};
use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::providers::HttpProviderConfig;
use crate::stores::redis::DEFAULT_NAMESPACE;
use crate::stores::{MokaStoreConfig, RedisStoreConfig};

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "WORD_CACHE_CONFIG";
/// Settings file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yml";

const ENV_PREFIX: &str = "WORD_CACHE";

/// Error loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SettingsError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    pub upstream: UpstreamSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which store backs the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    /// In-process Moka store, for running without Redis.
    Memory,
}

#[derive(Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub backend: CacheBackend,
    #[serde(default = "default_cache_url")]
    pub url: String,
    /// Expiry applied to every definition written, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Entry limit for the memory backend.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            backend: CacheBackend::default(),
            url: default_cache_url(),
            ttl_secs: default_ttl_secs(),
            namespace: default_namespace(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl fmt::Debug for CacheSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSettings")
            .field("backend", &self.backend)
            .field("url", &redact_url(&self.url))
            .field("ttl_secs", &self.ttl_secs)
            .field("namespace", &self.namespace)
            .field("max_capacity", &self.max_capacity)
            .finish()
    }
}

/// Mask the password in a connection URL. Unparseable URLs are hidden entirely.
fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<unparseable>".to_string(),
    }
}

#[derive(Clone, Deserialize)]
pub struct UpstreamSettings {
    pub dictionary_url: String,
    pub random_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl fmt::Debug for UpstreamSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamSettings")
            .field("dictionary_url", &self.dictionary_url)
            .field("random_url", &self.random_url)
            .field("api_key", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cache_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_max_capacity() -> u64 {
    10_000
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// `WORD_CACHE_*` variables. Values stay strings until deserialized, so an
/// all-digit credential keeps its leading zeros.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

impl Settings {
    /// Load settings from the file named by `WORD_CACHE_CONFIG` (or
    /// `config/config.yml`) plus the environment, then validate them.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&path)
    }

    /// Load settings from `path` (optional) plus the environment, then validate them.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        Self::load_layered(path, environment())
    }

    fn load_layered(path: &Path, environment: Environment) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.upstream.api_key.trim().is_empty() {
            return Err(SettingsError::invalid("upstream.api_key", "must be set"));
        }

        for (field, raw) in [
            ("upstream.dictionary_url", &self.upstream.dictionary_url),
            ("upstream.random_url", &self.upstream.random_url),
        ] {
            Url::parse(raw)
                .map_err(|e| SettingsError::invalid(field, format!("'{}': {}", raw, e)))?;
        }

        if self.cache.ttl_secs == 0 {
            return Err(SettingsError::invalid("cache.ttl_secs", "must be positive"));
        }

        if self.cache.backend == CacheBackend::Redis && self.cache.url.trim().is_empty() {
            return Err(SettingsError::invalid(
                "cache.url",
                "must be set for the redis backend",
            ));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn redis_config(&self) -> RedisStoreConfig {
        RedisStoreConfig {
            url: self.cache.url.clone(),
            namespace: self.cache.namespace.clone(),
        }
    }

    pub fn moka_config(&self) -> MokaStoreConfig {
        MokaStoreConfig {
            max_capacity: self.cache.max_capacity,
        }
    }

    pub fn provider_config(&self) -> HttpProviderConfig {
        HttpProviderConfig {
            dictionary_url: self.upstream.dictionary_url.clone(),
            random_url: self.upstream.random_url.clone(),
            api_key: self.upstream.api_key.clone(),
            timeout: Duration::from_millis(self.upstream.timeout_ms),
        }
    }
}
