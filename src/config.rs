//! Configuration Management
//!
//! Handles client configuration for cloudmon: API endpoint, tenant scoping
//! and the bearer token used by the transport. Values resolve env-first,
//! then from the persisted config file, then built-in defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default public API endpoint, including the API version
pub const DEFAULT_API_URL: &str = "https://monitoring.api.rackspacecloud.com/v1.0";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API base URL override (includes the version segment)
    #[serde(default)]
    pub api_url: Option<String>,
    /// Tenant/account id appended to the base URL
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cloudmon").join("config.json"))
    }

    /// Load configuration: environment variables take precedence over the
    /// config file on disk.
    pub fn load() -> Self {
        let mut config = Self::load_file();

        if let Ok(url) = std::env::var("CLOUDMON_API_URL") {
            config.api_url = Some(url);
        }
        if let Ok(tenant) = std::env::var("CLOUDMON_TENANT_ID") {
            config.tenant_id = Some(tenant);
        }
        if let Ok(token) = std::env::var("CLOUDMON_TOKEN") {
            config.token = Some(token);
        }

        config
    }

    /// Load configuration from disk
    fn load_file() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let content = serde_json::to_string_pretty(self).map_err(Error::Encode)?;
        std::fs::write(&path, content).map_err(|e| Error::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Effective API URL (env/config > default), without a trailing slash
    pub fn effective_api_url(&self) -> String {
        let url = self
            .api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        url.trim_end_matches('/').to_string()
    }

    /// Full base URL with the tenant id appended, the root every request
    /// path is joined onto.
    pub fn base_url(&self) -> String {
        match &self.tenant_id {
            Some(tenant) => format!("{}/{}", self.effective_api_url(), tenant),
            None => self.effective_api_url(),
        }
    }

    /// Effective bearer token (empty if unset)
    pub fn effective_token(&self) -> String {
        self.token.clone().unwrap_or_default()
    }
}
