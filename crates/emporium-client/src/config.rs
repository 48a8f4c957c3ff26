//! # Client Configuration
//!
//! Where the backend lives and where the session is kept.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     EMPORIUM_API_URL=https://shop.example.com/api/v1                   │
//! │     EMPORIUM_TIMEOUT_SECS=30                                           │
//! │     EMPORIUM_SESSION_PATH=/tmp/emporium-session.json                   │
//! │     EMPORIUM_PAGE_SIZE=25                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/emporium-admin/client.toml (Linux)                       │
//! │     ~/Library/Application Support/com.emporium.admin/client.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8000/api/v1, no timeout, page size 10             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://shop.example.com/api/v1"
//! request_timeout_secs = 30   # omit for no client-side timeout
//! user_agent = "emporium-admin/0.1"
//!
//! [session]
//! path = "/var/lib/emporium/session.json"
//!
//! [lists]
//! default_page_size = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// API Settings
// =============================================================================

/// Settings for the HTTP connection to the admin backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client-side request timeout. `None` waits for the server indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Value of the `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_user_agent() -> String {
    format!("emporium-admin/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Where the session store keeps `token` and `user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Session file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// =============================================================================
// List Settings
// =============================================================================

/// Defaults for list screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSettings {
    /// Rows per page on client-driven lists and the initial server page size.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

fn default_page_size() -> usize {
    emporium_core::DEFAULT_PAGE_SIZE
}

impl Default for ListSettings {
    fn default() -> Self {
        ListSettings {
            default_page_size: default_page_size(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub lists: ListSettings,
}

impl ClientConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load client config, using defaults");
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.api.base_url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0 (omit it for no timeout)".into(),
            ));
        }

        if self.lists.default_page_size == 0
            || self.lists.default_page_size > emporium_core::MAX_PAGE_SIZE as usize
        {
            return Err(ConfigError::Invalid(format!(
                "default_page_size must be between 1 and {}",
                emporium_core::MAX_PAGE_SIZE
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("EMPORIUM_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(secs) = std::env::var("EMPORIUM_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.request_timeout_secs = Some(s),
                Err(_) => warn!(value = %secs, "Ignoring non-numeric EMPORIUM_TIMEOUT_SECS"),
            }
        }

        if let Ok(path) = std::env::var("EMPORIUM_SESSION_PATH") {
            self.session.path = Some(PathBuf::from(path));
        }

        if let Ok(size) = std::env::var("EMPORIUM_PAGE_SIZE") {
            if let Ok(s) = size.parse::<usize>() {
                self.lists.default_page_size = s;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "emporium", "admin")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    /// Returns the request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.request_timeout_secs.map(Duration::from_secs)
    }

    /// Returns the session file path, falling back to the platform data dir.
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session.path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "emporium", "admin")
                .map(|dirs| dirs.data_dir().join("session.json"))
        })
    }
}
