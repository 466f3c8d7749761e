//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `links_url` or `categories_url` is not an http(s) URL
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - either TTL is 0
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("links_url", &self.links_url)?;
        validate_http_url("categories_url", &self.categories_url)?;

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.records_ttl_secs == 0 {
            return Err(ConfigError::Invalid { field: "records_ttl_secs".into(), reason: "must be greater than 0".into() });
        }
        if self.descriptions_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "descriptions_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if let Some(base_url) = self.describer_base_url() {
            validate_http_url("describer_base_url", base_url)?;
            if self.describer_api_key.is_none() {
                tracing::warn!("describer_base_url is set without describer_api_key; requests are unauthenticated");
            }
        }

        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed =
        url::Url::parse(value).map_err(|e| ConfigError::Invalid { field: field.into(), reason: e.to_string() })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::Invalid { field: field.into(), reason: format!("unsupported scheme: {scheme}") }),
    }
}
