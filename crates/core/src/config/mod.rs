//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SQUIRREL_*)
//! 2. TOML config file (if SQUIRREL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::manifest::Manifest;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SQUIRREL_*)
/// 2. TOML config file (if SQUIRREL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache database.
    ///
    /// Set via SQUIRREL_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Logical cache name shared across versions.
    ///
    /// Set via SQUIRREL_CACHE_NAME environment variable.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Cache version. Bump whenever the manifest or policy changes; the
    /// generation name embeds it, and activation deletes every other
    /// generation.
    ///
    /// Set via SQUIRREL_CACHE_VERSION environment variable.
    #[serde(default = "default_cache_version")]
    pub cache_version: u32,

    /// Deployment origin that relative manifest entries resolve against.
    ///
    /// Set via SQUIRREL_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Asset manifest pre-cached at install.
    #[serde(default)]
    pub manifest: Manifest,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SQUIRREL_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via SQUIRREL_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SQUIRREL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./squirrel-cache.sqlite")
}

fn default_cache_name() -> String {
    "squirrel-assets".into()
}

fn default_cache_version() -> u32 {
    1
}

fn default_origin() -> String {
    "http://localhost:8080".into()
}

fn default_user_agent() -> String {
    "squirrel/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            cache_name: default_cache_name(),
            cache_version: default_cache_version(),
            origin: default_origin(),
            manifest: Manifest::default(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Name of the current cache generation: `{cache_name}-v{cache_version}`.
    pub fn generation(&self) -> String {
        format!("{}-v{}", self.cache_name, self.cache_version)
    }

    /// Parsed deployment origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the origin is not a valid URL.
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin).map_err(|e| ConfigError::Invalid {
            field: "origin".into(),
            reason: e.to_string(),
        })
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SQUIRREL_`
    /// 2. TOML file from `SQUIRREL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SQUIRREL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SQUIRREL_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./squirrel-cache.sqlite"));
        assert_eq!(config.cache_name, "squirrel-assets");
        assert_eq!(config.cache_version, 1);
        assert_eq!(config.origin, "http://localhost:8080");
        assert_eq!(config.manifest.len(), 6);
        assert_eq!(config.user_agent, "squirrel/0.1");
        assert_eq!(config.max_bytes, 5_242_880);
        assert_eq!(config.timeout_ms, 20_000);
    }

    #[test]
    fn test_generation_name() {
        let config = AppConfig { cache_name: "emoji-cache".into(), cache_version: 2, ..Default::default() };
        assert_eq!(config.generation(), "emoji-cache-v2");
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_origin_url() {
        let config = AppConfig::default();
        assert_eq!(config.origin_url().unwrap().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_origin_url_invalid() {
        let config = AppConfig { origin: "not a url".into(), ..Default::default() };
        assert!(matches!(config.origin_url(), Err(ConfigError::Invalid { field, .. }) if field == "origin"));
    }
}
