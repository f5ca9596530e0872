//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ResultSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Catalog endpoints and HTTP behavior
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// CSS selectors describing the catalog's result markup
    #[serde(default)]
    pub selectors: ResultSelectors,

    /// Playlist provider credentials
    #[serde(default)]
    pub spotify: SpotifyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Write the configuration as TOML, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::config(format!("cannot serialize config: {e}")))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.user_agent.trim().is_empty() {
            return Err(AppError::validation("catalog.user_agent is empty"));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(AppError::validation("catalog.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.catalog.base_url)
            .map_err(|e| AppError::validation(format!("catalog.base_url: {e}")))?;
        url::Url::parse(&self.catalog.download_base_url)
            .map_err(|e| AppError::validation(format!("catalog.download_base_url: {e}")))?;
        self.selectors.validate()?;
        Ok(())
    }
}

/// Catalog endpoints and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Site root used for search and detail pages
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Prefix joined with a code to form its download URL
    #[serde(default = "defaults::download_base_url")]
    pub download_base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between consecutive queries in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            download_base_url: defaults::download_base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

impl CatalogConfig {
    /// Relevance-ordered search URL for an already encoded query.
    pub fn search_url(&self, encoded_query: &str) -> String {
        format!(
            "{}/?s={}&orderby=relevance&order=DESC",
            self.base_url.trim_end_matches('/'),
            encoded_query
        )
    }

    /// Detail page URL for a code.
    pub fn detail_url(&self, code: &str) -> String {
        format!("{}/songs/{}", self.base_url.trim_end_matches('/'), code)
    }

    /// Download URL for a code.
    pub fn download_url(&self, code: &str) -> String {
        format!("{}/{}", self.download_base_url.trim_end_matches('/'), code)
    }
}

/// Spotify Web API credentials and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "defaults::spotify_api")]
    pub api_base_url: String,

    #[serde(default = "defaults::spotify_token")]
    pub token_url: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base_url: defaults::spotify_api(),
            token_url: defaults::spotify_token(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://bsaber.com".into()
    }
    pub fn download_base_url() -> String {
        "https://beatsaver.com/api/download/key".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; saberdl/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }

    pub fn spotify_api() -> String {
        "https://api.spotify.com/v1".into()
    }
    pub fn spotify_token() -> String {
        "https://accounts.spotify.com/api/token".into()
    }
}
