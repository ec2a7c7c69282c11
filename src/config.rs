// src/config.rs

//! Manages service configuration: loading, environment overrides, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use tracing::warn;

/// Environment variable overriding `upstream.app_id`.
pub const APP_ID_ENV: &str = "LARDER_APP_ID";
/// Environment variable overriding `upstream.app_key`.
pub const APP_KEY_ENV: &str = "LARDER_APP_KEY";

/// Connection settings for the upstream recipe provider.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpstreamConfig {
    /// The paginated search endpoint.
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// The lookup-by-URI endpoint.
    #[serde(default = "default_by_uri_url")]
    pub by_uri_url: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default, skip_serializing)]
    pub app_key: String,
    /// The fixed prefix of every canonical recipe URI. Stripping it yields the recipe id.
    #[serde(default = "default_recipe_uri_prefix")]
    pub recipe_uri_prefix: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// How many times a transport failure or a 5xx/429 response is retried. `0` disables retries.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// The base delay of the exponential retry backoff in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_search_url() -> String {
    "https://api.edamam.com/api/recipes/v2".to_string()
}
fn default_by_uri_url() -> String {
    "https://api.edamam.com/api/recipes/v2/by-uri".to_string()
}
fn default_recipe_uri_prefix() -> String {
    "http://www.edamam.com/ontologies/edamam.owl#recipe_".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_max_retries() -> u32 {
    2
}
fn default_retry_backoff_ms() -> u64 {
    200
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            by_uri_url: default_by_uri_url(),
            app_id: String::new(),
            app_key: String::new(),
            recipe_uri_prefix: default_recipe_uri_prefix(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Expiry settings for the key-value caches.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CacheConfig {
    /// TTL of cached single recipes. `0` means no expiry.
    #[serde(default = "default_week")]
    pub recipe_ttl_seconds: u64,
    /// TTL of cached search pages. `0` means no expiry.
    #[serde(default = "default_week")]
    pub page_ttl_seconds: u64,
    /// How often the active TTL sweeper runs.
    #[serde(default = "default_ttl_sweep_interval_ms")]
    pub ttl_sweep_interval_ms: u64,
}

fn default_week() -> u64 {
    60 * 60 * 24 * 7
}
fn default_ttl_sweep_interval_ms() -> u64 {
    1000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            recipe_ttl_seconds: default_week(),
            page_ttl_seconds: default_week(),
            ttl_sweep_interval_ms: default_ttl_sweep_interval_ms(),
        }
    }
}

impl CacheConfig {
    pub fn recipe_ttl(&self) -> Option<Duration> {
        ttl_from_seconds(self.recipe_ttl_seconds)
    }

    pub fn page_ttl(&self) -> Option<Duration> {
        ttl_from_seconds(self.page_ttl_seconds)
    }

    pub fn ttl_sweep_interval(&self) -> Duration {
        Duration::from_millis(self.ttl_sweep_interval_ms)
    }
}

fn ttl_from_seconds(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaginationConfig {
    /// Page size used when slicing tag-filtered results.
    #[serde(default = "default_tag_page_size")]
    pub tag_page_size: usize,
    /// Highest page a client may request. Reaching page N cold costs N upstream calls.
    #[serde(default = "default_max_page")]
    pub max_page: u32,
}

fn default_tag_page_size() -> usize {
    20
}
fn default_max_page() -> u32 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            tag_page_size: default_tag_page_size(),
            max_page: default_max_page(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecipesConfig {
    /// Upper bound on concurrent lookups issued by one batch fetch or enrichment.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

fn default_fetch_concurrency() -> usize {
    16
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

/// A raw representation of the config file before validation and resolution.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    upstream: UpstreamConfig,
    #[serde(default)]
    cache: CacheConfig,
    #[serde(default)]
    pagination: PaginationConfig,
    #[serde(default)]
    recipes: RecipesConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    4000
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Represents the final, validated service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub recipes: RecipesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            pagination: PaginationConfig::default(),
            recipes: RecipesConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    ///
    /// Upstream credentials in the environment take precedence over the file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Replaces the upstream credentials with those set in the environment, if any.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(app_id) = std::env::var(APP_ID_ENV) {
            self.upstream.app_id = app_id;
        }
        if let Ok(app_key) = std::env::var(APP_KEY_ENV) {
            self.upstream.app_key = app_key;
        }
    }

    /// Parses a configuration from TOML text without validating it.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents)?;
        Ok(Config {
            host: raw.host,
            port: raw.port,
            log_level: raw.log_level,
            upstream: raw.upstream,
            cache: raw.cache,
            pagination: raw.pagination,
            recipes: raw.recipes,
        })
    }

    /// Validates the resolved configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        url::Url::parse(&self.upstream.search_url)
            .with_context(|| format!("invalid upstream.search_url '{}'", self.upstream.search_url))?;
        url::Url::parse(&self.upstream.by_uri_url)
            .with_context(|| format!("invalid upstream.by_uri_url '{}'", self.upstream.by_uri_url))?;
        if self.upstream.recipe_uri_prefix.trim().is_empty() {
            return Err(anyhow!("upstream.recipe_uri_prefix cannot be empty"));
        }
        if self.upstream.timeout_ms == 0 {
            return Err(anyhow!("upstream.timeout_ms cannot be 0"));
        }
        if self.upstream.app_id.is_empty() || self.upstream.app_key.is_empty() {
            warn!(
                "upstream credentials are not set ({} / {}); recipe searches will be rejected by the provider.",
                APP_ID_ENV, APP_KEY_ENV
            );
        }
        if self.cache.ttl_sweep_interval_ms == 0 {
            return Err(anyhow!("cache.ttl_sweep_interval_ms cannot be 0"));
        }
        if self.pagination.tag_page_size == 0 {
            return Err(anyhow!("pagination.tag_page_size cannot be 0"));
        }
        if self.pagination.max_page == 0 {
            return Err(anyhow!("pagination.max_page cannot be 0"));
        }
        if self.recipes.fetch_concurrency == 0 {
            return Err(anyhow!("recipes.fetch_concurrency cannot be 0"));
        }
        Ok(())
    }
}
