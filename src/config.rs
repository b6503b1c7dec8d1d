use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Hosted recipe API used in production
pub const HOSTED_API_URL: &str = "https://ind-recipes-api.onrender.com";
/// Recipe API started locally during development
pub const LOCAL_API_URL: &str = "http://localhost:4000";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FinderConfig {
    /// Where the recipe dataset comes from
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Result presentation
    #[serde(default)]
    pub search: SearchConfig,
    /// Online recipe API used by smart search
    #[serde(default)]
    pub api: ApiConfig,
    /// Hosted document store for likes, views and comments
    #[serde(default)]
    pub store: StoreConfig,
}

/// Configuration for loading the recipe dataset
#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// Path or http(s) URL of the JSON dataset
    #[serde(default = "default_dataset_source")]
    pub source: String,
    /// Soft timeout for the one-shot load, in seconds
    #[serde(default = "default_dataset_timeout")]
    pub timeout_secs: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: default_dataset_source(),
            timeout_secs: default_dataset_timeout(),
        }
    }
}

impl DatasetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Maximum number of cards shown per search
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
    /// Use the bundled dataset when the online API fails
    #[serde(default)]
    pub fallback_to_offline: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            display_limit: default_display_limit(),
            fallback_to_offline: false,
        }
    }
}

/// Configuration for the online recipe API and its retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL; overrides `local` when set
    pub base_url: Option<String>,
    /// Talk to the development server on localhost
    #[serde(default)]
    pub local: bool,
    /// Number of attempts before giving up
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Initial delay between retries in milliseconds (grows with each attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            local: false,
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_api_timeout(),
        }
    }
}

impl ApiConfig {
    /// Resolve the base URL: explicit value, then local/hosted default
    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.local => LOCAL_API_URL.to_string(),
            None => HOSTED_API_URL.to_string(),
        }
    }
}

/// Connection details for the hosted document store
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    pub base_url: Option<String>,
    /// Sent as a bearer token when present
    pub api_key: Option<String>,
}

// Default value functions
fn default_dataset_source() -> String {
    "recipes_offline.json".to_string()
}

fn default_dataset_timeout() -> u64 {
    5
}

fn default_display_limit() -> usize {
    6
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_api_timeout() -> u64 {
    30
}

impl FinderConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_FINDER__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_FINDER__API__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`FinderConfig::load`] for the lookup order.
pub fn load_config() -> Result<FinderConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_FINDER__DATASET__SOURCE
        .add_source(
            Environment::with_prefix("RECIPE_FINDER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
