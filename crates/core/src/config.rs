use serde::Deserialize;

use crate::error::{CreativeError, CreativeResult};

/// Root application configuration. Loaded from environment variables
/// with the prefix `CREATIVE_PILOT__` and an optional TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub guidelines: GuidelinesConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Where the guideline engine takes its rules and fallback brand kit from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuidelinesConfig {
    /// JSON rule catalog replacing the built-in one.
    #[serde(default)]
    pub rules_path: Option<String>,
    /// JSON brand kit applied to raw validations that carry none.
    #[serde(default)]
    pub default_brand_kit_path: Option<String>,
}

/// Limits on the in-memory share store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_max_blob_bytes")]
    pub max_blob_bytes: usize,
    /// Shares kept at once; the oldest is evicted past this.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_max_blob_bytes() -> usize {
    1024 * 1024
}
fn default_max_entries() -> usize {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_blob_bytes: default_max_blob_bytes(),
            max_entries: default_max_entries(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            guidelines: GuidelinesConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional config file, then environment variables.
    /// Environment values win over the file.
    pub fn load(path: Option<&str>) -> CreativeResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("CREATIVE_PILOT")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| CreativeError::Config(e.to_string()))
    }
}
