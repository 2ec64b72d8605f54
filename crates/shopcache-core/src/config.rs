//! Application configuration management.
//!
//! Configuration is stored at `~/.config/shopcache/config.json` and is
//! entirely optional. The catalog endpoint can also be overridden with the
//! `SHOPCACHE_CATALOG_URL` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::client::{DEFAULT_CATALOG_URL, REQUEST_TIMEOUT_SECS};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "shopcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the catalog endpoint
pub const CATALOG_URL_ENV: &str = "SHOPCACHE_CATALOG_URL";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    pub catalog_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Endpoint to fetch from: env override, then config file, then default.
    pub fn catalog_url(&self) -> String {
        self.resolve_catalog_url(std::env::var(CATALOG_URL_ENV).ok())
    }

    fn resolve_catalog_url(&self, env_override: Option<String>) -> String {
        env_override
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.catalog_url.clone())
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS))
    }
}
