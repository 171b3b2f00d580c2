//! Configuration loaded from `~/.config/memeforge/config.toml`.
//!
//! ```toml
//! [providers]
//! tenor_api_key = "..."
//! giphy_api_key = "..."
//! limit = 50
//! timeout_secs = 8
//! ```
//!
//! `TENOR_API_KEY` and `GIPHY_API_KEY` override the file. Unset keys fall
//! back to the providers' public demo keys.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::http_client::DEFAULT_USER_AGENT;
use crate::provider::DEFAULT_LIMIT;

/// Environment variable overriding the Tenor key.
pub const TENOR_KEY_VAR: &str = "TENOR_API_KEY";
/// Environment variable overriding the Giphy key.
pub const GIPHY_KEY_VAR: &str = "GIPHY_API_KEY";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProviderSettings,
}

/// Provider access settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub tenor_api_key: Option<String>,
    pub giphy_api_key: Option<String>,
    /// Results requested from Tenor and Giphy.
    pub limit: u32,
    /// Per-provider deadline.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            tenor_api_key: None,
            giphy_api_key: None,
            limit: DEFAULT_LIMIT,
            timeout_secs: 8,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load from the default path, then apply environment overrides.
    ///
    /// Returns defaults if the file doesn't exist (configuration is optional).
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::load_from(&config_path())?;
        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Load from `path` without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Replace API keys with values from `lookup` where it has a non-blank one.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_blank(TENOR_KEY_VAR) {
            self.providers.tenor_api_key = Some(key);
        }
        if let Some(key) = non_blank(GIPHY_KEY_VAR) {
            self.providers.giphy_api_key = Some(key);
        }
        self
    }

    pub fn tenor_api_key(&self) -> Option<String> {
        self.providers.tenor_api_key.clone()
    }

    pub fn giphy_api_key(&self) -> Option<String> {
        self.providers.giphy_api_key.clone()
    }

    /// Per-provider deadline; zero is treated as one second.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.providers.timeout_secs.max(1))
    }
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("memeforge")
        .join("config.toml")
}
