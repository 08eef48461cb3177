//! Configuration management for Itinera
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ItineraError, Result};
use crate::share::SharePlatform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Itinera
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Session token persistence
    #[serde(default)]
    pub session: SessionConfig,
    /// Map rendering
    #[serde(default)]
    pub map: MapConfig,
    /// Share links
    #[serde(default)]
    pub share: ShareConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the planner endpoints (`/login`, `/itinerary`, ...)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL for `/generate-itinerary`
    ///
    /// The itinerary generator may be served separately from the other
    /// endpoints. When unset, `base_url` is used.
    #[serde(default)]
    pub generate_base_url: Option<String>,

    /// Header carrying the session token on protected requests.
    ///
    /// Setting this to `authorization` sends `Authorization: Bearer <token>`
    /// instead of the raw token.
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// Optional per-request timeout in seconds. Requests never time out when
    /// unset.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_auth_header() -> String {
    "x-access-token".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            generate_base_url: None,
            auth_header: default_auth_header(),
            timeout_seconds: None,
        }
    }
}

/// Where the session token is persisted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionBackend {
    /// JSON document in the user data directory
    #[default]
    File,
    /// OS native credential store
    Keyring,
    /// Process memory; nothing survives the invocation
    Memory,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Persistence backend for the token
    #[serde(default)]
    pub backend: SessionBackend,

    /// Storage key the token is saved under
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Explicit location for the file backend
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// User identifier sent with itinerary creation requests
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_token_key() -> String {
    "token".to_string()
}

fn default_user_id() -> String {
    "test_user".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            token_key: default_token_key(),
            file_path: None,
            user_id: default_user_id(),
        }
    }
}

/// Map widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Google Maps API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Zoom level of the rendered map
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Rendered image width in pixels
    #[serde(default = "default_map_width")]
    pub width: u32,

    /// Rendered image height in pixels
    #[serde(default = "default_map_height")]
    pub height: u32,

    /// Static maps endpoint
    #[serde(default = "default_static_base_url")]
    pub static_base_url: String,
}

fn default_zoom() -> u8 {
    10
}

fn default_map_width() -> u32 {
    640
}

fn default_map_height() -> u32 {
    500
}

fn default_static_base_url() -> String {
    "https://maps.googleapis.com/maps/api/staticmap".to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            zoom: default_zoom(),
            width: default_map_width(),
            height: default_map_height(),
            static_base_url: default_static_base_url(),
        }
    }
}

/// Share widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Platforms to render share links for, in display order
    #[serde(default = "default_platforms")]
    pub platforms: Vec<SharePlatform>,
}

fn default_platforms() -> Vec<SharePlatform> {
    SharePlatform::ALL.to_vec()
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            platforms: default_platforms(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Read a configuration file without environment or CLI overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ItineraError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ItineraError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("ITINERA_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(generate_base_url) = std::env::var("ITINERA_GENERATE_BASE_URL") {
            self.api.generate_base_url = Some(generate_base_url);
        }

        if let Ok(header) = std::env::var("ITINERA_AUTH_HEADER") {
            self.api.auth_header = header;
        }

        if let Ok(timeout) = std::env::var("ITINERA_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid ITINERA_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(backend) = std::env::var("ITINERA_SESSION_BACKEND") {
            self.session.backend = match backend.to_lowercase().as_str() {
                "file" => SessionBackend::File,
                "keyring" => SessionBackend::Keyring,
                "memory" => SessionBackend::Memory,
                _ => {
                    tracing::warn!("Invalid session backend: {}, using default", backend);
                    SessionBackend::default()
                }
            };
        }

        if let Ok(path) = std::env::var("ITINERA_SESSION_FILE") {
            self.session.file_path = Some(PathBuf::from(path));
        }

        if let Ok(user_id) = std::env::var("ITINERA_USER_ID") {
            self.session.user_id = user_id;
        }

        if let Ok(api_key) = std::env::var("ITINERA_MAPS_API_KEY") {
            self.map.api_key = Some(api_key);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(base_url) = &cli.base_url {
            tracing::debug!(base_url = %base_url, "CLI override: base URL");
            self.api.base_url = base_url.clone();
        }
    }

    /// Base URL for `/generate-itinerary`
    pub fn generate_base_url(&self) -> &str {
        self.api
            .generate_base_url
            .as_deref()
            .unwrap_or(&self.api.base_url)
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("api.base_url", Some(self.api.base_url.as_str())),
            ("api.generate_base_url", self.api.generate_base_url.as_deref()),
        ] {
            let Some(value) = value else { continue };
            let parsed = url::Url::parse(value).map_err(|e| {
                ItineraError::Config(format!("{} is not a valid URL ({}): {}", name, value, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ItineraError::Config(format!(
                    "{} must use http or https, got: {}",
                    name,
                    parsed.scheme()
                ))
                .into());
            }
        }

        if self.api.auth_header.trim().is_empty() {
            return Err(
                ItineraError::Config("api.auth_header cannot be empty".to_string()).into(),
            );
        }

        if self.api.timeout_seconds == Some(0) {
            return Err(ItineraError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.session.token_key.trim().is_empty() {
            return Err(
                ItineraError::Config("session.token_key cannot be empty".to_string()).into(),
            );
        }

        if self.map.zoom > 21 {
            return Err(ItineraError::Config(
                "map.zoom must be between 0 and 21".to_string(),
            )
            .into());
        }

        if self.map.width == 0 || self.map.height == 0 {
            return Err(ItineraError::Config(
                "map.width and map.height must be greater than 0".to_string(),
            )
            .into());
        }

        if self.share.platforms.is_empty() {
            return Err(ItineraError::Config(
                "share.platforms must list at least one platform".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
