//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `POSLEEP_BACKEND_URL` - Backend base URL (default: `http://localhost:8080/api`)
//! - `POSLEEP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `POSLEEP_TOKEN_DIR` - Directory holding the saved login token
//!   (default: `$HOME/.posleep`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default backend URL when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080/api";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash
    pub backend_url: String,
    /// Transport timeout for a single request
    pub timeout: Duration,
    /// Directory of the file-backed token store
    pub token_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or no token directory
    /// can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend_url =
            normalize_backend_url(&get_env_or_default("POSLEEP_BACKEND_URL", DEFAULT_BACKEND_URL))
                .map_err(|e| ConfigError::InvalidEnvVar("POSLEEP_BACKEND_URL".to_string(), e))?;

        let timeout_secs = get_env_or_default("POSLEEP_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("POSLEEP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "POSLEEP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let token_dir = match get_optional_env("POSLEEP_TOKEN_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => get_optional_env("HOME")
                .map(|home| PathBuf::from(home).join(".posleep"))
                .ok_or_else(|| ConfigError::MissingEnvVar("POSLEEP_TOKEN_DIR".to_string()))?,
        };

        Ok(Self {
            backend_url,
            timeout: Duration::from_secs(timeout_secs),
            token_dir,
        })
    }

    /// Configuration for a backend at `backend_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is not absolute http(s).
    pub fn for_backend(backend_url: &str, token_dir: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: normalize_backend_url(backend_url)
                .map_err(|e| ConfigError::InvalidEnvVar("POSLEEP_BACKEND_URL".to_string(), e))?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_dir,
        })
    }

    /// Replace the backend URL, e.g. from a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is not absolute http(s).
    pub fn with_backend_url(mut self, backend_url: &str) -> Result<Self, ConfigError> {
        self.backend_url = normalize_backend_url(backend_url)
            .map_err(|e| ConfigError::InvalidEnvVar("POSLEEP_BACKEND_URL".to_string(), e))?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate an http(s) URL and strip trailing slashes.
fn normalize_backend_url(raw: &str) -> Result<String, String> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", parsed.scheme()));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
