//! Client settings.
//!
//! Values resolve with precedence: explicit flag, then environment, then the
//! settings file, then defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::{normalize_base_url, normalize_text_option};
use crate::{Error, Result};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const API_URL_ENV: &str = "MEMORY_VAULT_API_URL";
pub const USER_ID_ENV: &str = "MEMORY_VAULT_USER_ID";

/// Persisted settings file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_SCHEMA_VERSION,
            api_base_url: None,
            user_id: None,
            request_timeout_secs: None,
        }
    }
}

const fn default_config_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

/// Settings after applying flags, environment and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub user_id: Option<u64>,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!(
                "Failed to read config at {}: {}",
                path.display(),
                error
            ))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {}",
                path.display(),
                error
            ))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        std::fs::write(path, serde_json::to_string_pretty(&normalized)?)?;
        Ok(())
    }

    /// Store a base URL after validating it.
    pub fn set_api_base_url(&mut self, raw: &str) -> Result<()> {
        self.api_base_url = Some(normalize_base_url(raw).map_err(Error::Config)?);
        Ok(())
    }

    /// Resolve final values using process environment variables.
    pub fn resolve(&self, flag_api_url: Option<&str>) -> Result<ResolvedConfig> {
        self.resolve_with(flag_api_url, |key| std::env::var(key).ok())
    }

    /// Resolve final values with an injectable environment lookup.
    pub fn resolve_with<F>(&self, flag_api_url: Option<&str>, env: F) -> Result<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = flag_api_url
            .map(ToString::to_string)
            .and_then(|value| normalize_text_option(Some(value)))
            .or_else(|| normalize_text_option(env(API_URL_ENV)))
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = normalize_base_url(&api_base_url).map_err(Error::Config)?;

        let user_id = match normalize_text_option(env(USER_ID_ENV)) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                Error::Config(format!("{USER_ID_ENV} must be a numeric user id, got '{raw}'"))
            })?),
            None => self.user_id,
        };

        let timeout_secs = self
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(ResolvedConfig {
            api_base_url,
            user_id,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_text_option(self.api_base_url.take())
            .map(|url| url.trim_end_matches('/').to_string());
        if self.request_timeout_secs == Some(0) {
            self.request_timeout_secs = None;
        }
    }
}
