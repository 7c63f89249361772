//! Client configuration.
//!
//! Configuration is loaded from environment variables with defaults that
//! point at a backend running on the developer's machine.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default recommendation search radius in kilometres.
pub const DEFAULT_MAX_DISTANCE_KM: u32 = 150;

/// Directory name used under `$HOME` for durable client state.
pub const DEFAULT_STORAGE_DIR_NAME: &str = ".internship-hub";

/// Internship Hub client configuration.
///
/// Holds no credentials, so the derived `Debug` is safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_base_url: String,

    /// Directory holding the persisted session token.
    pub storage_dir: PathBuf,

    /// Default radius for recommendation requests.
    pub default_max_distance_km: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API URL: {0}")]
    InvalidApiUrl(String),

    #[error("Invalid storage directory: {0}")]
    InvalidStorageDir(String),

    #[error("Invalid max distance configuration: {0}")]
    InvalidMaxDistance(String),
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is present but malformed.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let raw_url = vars
            .get("HUB_API_URL")
            .map_or(DEFAULT_API_URL, String::as_str);
        let api_base_url = normalize_base_url(raw_url)?;

        let storage_dir = match vars.get("HUB_STORAGE_DIR") {
            Some(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::InvalidStorageDir(
                    "HUB_STORAGE_DIR must not be empty".to_string(),
                ));
            }
            Some(dir) => PathBuf::from(dir),
            None => vars
                .get("HOME")
                .filter(|home| !home.is_empty())
                .map_or_else(
                    || PathBuf::from(DEFAULT_STORAGE_DIR_NAME),
                    |home| PathBuf::from(home).join(DEFAULT_STORAGE_DIR_NAME),
                ),
        };

        // Parse default recommendation radius with validation
        let default_max_distance_km = if let Some(value_str) = vars.get("HUB_MAX_DISTANCE_KM") {
            let value: u32 = value_str.parse().map_err(|e| {
                ConfigError::InvalidMaxDistance(format!(
                    "HUB_MAX_DISTANCE_KM must be a valid positive integer, got '{value_str}': {e}"
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidMaxDistance(
                    "HUB_MAX_DISTANCE_KM must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_MAX_DISTANCE_KM
        };

        Ok(ClientConfig {
            api_base_url,
            storage_dir,
            default_max_distance_km,
        })
    }

    /// Configuration for a given backend URL with all other values defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidApiUrl` if the URL is not http(s).
    pub fn for_base_url(api_base_url: &str) -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        vars.insert("HUB_API_URL".to_string(), api_base_url.to_string());
        Self::from_vars(&vars)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(format!(
            "HUB_API_URL must start with http:// or https://, got '{raw}'"
        )));
    }
    Ok(trimmed.to_string())
}
