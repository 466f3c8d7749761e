//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (TERRAVUE_*)
//! 2. TOML config file (if TERRAVUE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

const DEFAULT_LINKS_URL: &str = "https://raw.githubusercontent.com/TerraVueDev/assets/refs/heads/main/links.json";
const DEFAULT_CATEGORIES_URL: &str =
    "https://raw.githubusercontent.com/TerraVueDev/assets/refs/heads/main/categories.json";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (TERRAVUE_*)
/// 2. TOML config file (if TERRAVUE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL of the website → category document.
    ///
    /// Set via TERRAVUE_LINKS_URL environment variable.
    #[serde(default = "default_links_url")]
    pub links_url: String,

    /// URL of the category → impact metadata document.
    ///
    /// Set via TERRAVUE_CATEGORIES_URL environment variable.
    #[serde(default = "default_categories_url")]
    pub categories_url: String,

    /// Path to SQLite cache database.
    ///
    /// Set via TERRAVUE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via TERRAVUE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via TERRAVUE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Lifetime of the cached catalogue in seconds.
    #[serde(default = "default_records_ttl_secs")]
    pub records_ttl_secs: u64,

    /// Lifetime of cached generated descriptions in seconds.
    #[serde(default = "default_descriptions_ttl_secs")]
    pub descriptions_ttl_secs: u64,

    /// Base URL of an OpenAI-compatible API used for generated descriptions.
    ///
    /// Generation is disabled when unset.
    #[serde(default)]
    pub describer_base_url: Option<String>,

    /// Bearer token for the description API.
    #[serde(default)]
    pub describer_api_key: Option<String>,

    /// Model name sent to the description API.
    #[serde(default = "default_describer_model")]
    pub describer_model: String,
}

fn default_links_url() -> String {
    DEFAULT_LINKS_URL.into()
}

fn default_categories_url() -> String {
    DEFAULT_CATEGORIES_URL.into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./terravue-cache.sqlite")
}

fn default_user_agent() -> String {
    "terravue/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_records_ttl_secs() -> u64 {
    30 * 60
}

fn default_descriptions_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_describer_model() -> String {
    "gpt-4o-mini".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            links_url: default_links_url(),
            categories_url: default_categories_url(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            records_ttl_secs: default_records_ttl_secs(),
            descriptions_ttl_secs: default_descriptions_ttl_secs(),
            describer_base_url: None,
            describer_api_key: None,
            describer_model: default_describer_model(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn records_ttl(&self) -> Duration {
        Duration::from_secs(self.records_ttl_secs)
    }

    pub fn descriptions_ttl(&self) -> Duration {
        Duration::from_secs(self.descriptions_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("TERRAVUE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("TERRAVUE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Description API base URL, if generation is configured.
    pub fn describer_base_url(&self) -> Option<&str> {
        self.describer_base_url.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
