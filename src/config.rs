use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Url;

/// Default backend URL when POLICYPULSE_API_URL is not set
const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the PolicyPulse backend
    pub api_url: Url,

    /// Path to the durable session store (SQLite)
    pub store_path: PathBuf,

    /// HTTP connect timeout in seconds
    pub connect_timeout: u64,

    /// HTTP request timeout in seconds
    pub request_timeout: u64,
}

impl ClientConfig {
    /// Load configuration from the environment with priority: ENV > defaults.
    /// Reads a `.env` file if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = std::env::var("POLICYPULSE_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url)
            .with_context(|| format!("Invalid POLICYPULSE_API_URL: {}", api_url))?;

        let store_path = std::env::var("POLICYPULSE_SESSION_DB")
            .map(|s| expand_tilde(&s))
            .unwrap_or_else(|_| default_store_path());

        let connect_timeout = std::env::var("HTTP_CONNECT_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let request_timeout = std::env::var("HTTP_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            api_url,
            store_path,
            connect_timeout,
            request_timeout,
        })
    }

    /// Build a configuration pointing at an explicit backend and store path.
    /// Used by tests and embedding hosts that manage their own settings.
    pub fn new(api_url: &str, store_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            api_url: Url::parse(api_url)
                .with_context(|| format!("Invalid API URL: {}", api_url))?,
            store_path: store_path.into(),
            connect_timeout: 10,
            request_timeout: 30,
        })
    }

    /// Resolve a service base path against the API URL.
    pub fn endpoint(&self, base_path: &str) -> Result<Url> {
        self.api_url
            .join(base_path)
            .with_context(|| format!("Invalid base path: {}", base_path))
    }
}

/// Default session store location under the platform data directory
fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("policypulse")
        .join("session.sqlite3")
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/policypulse/session.sqlite3");
        assert!(path.to_string_lossy().contains("policypulse/session.sqlite3"));
        assert!(!path.to_string_lossy().starts_with('~'));

        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_endpoint_join() {
        let config = ClientConfig::new("http://localhost:8000", "/tmp/session.db").unwrap();
        let url = config.endpoint("/api/auth/login").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/auth/login");
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(ClientConfig::new("not a url", "/tmp/session.db").is_err());
    }
}
