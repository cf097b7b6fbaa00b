//! Configuration
//!
//! Validated runtime settings. Flag/env precedence is handled by clap in
//! `main`; this module checks the merged values.

use crate::digitalocean::client::DEFAULT_API_URL;
use anyhow::{Context, Result};
use std::fmt;
use url::Url;

/// Default port for the metrics endpoint
pub const DEFAULT_PORT: u16 = 8000;

/// Message printed when no token is available
pub const MISSING_TOKEN_MESSAGE: &str =
    "API token is required. Pass via --api-token or DO_API_TOKEN env variable.";

/// Exporter configuration
#[derive(Clone)]
pub struct Config {
    /// DigitalOcean API bearer token
    pub api_token: String,
    /// Port for the metrics endpoint
    pub port: u16,
    /// API base URL
    pub api_url: Url,
}

impl Config {
    /// Build a configuration from already-merged flag/env values
    ///
    /// An absent or blank token is an error.
    pub fn resolve(api_token: Option<String>, port: u16, api_url: &str) -> Result<Self> {
        let api_token = api_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow::anyhow!(MISSING_TOKEN_MESSAGE))?;

        let api_url = Url::parse(api_url)
            .with_context(|| format!("Invalid API URL: {}", api_url))?;

        Ok(Self {
            api_token,
            port,
            api_url,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("port", &self.port)
            .field("api_url", &self.api_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_token() {
        let config = Config::resolve(Some("dop_v1_abc".to_string()), 9100, DEFAULT_API_URL).unwrap();
        assert_eq!(config.api_token, "dop_v1_abc");
        assert_eq!(config.port, 9100);
        assert_eq!(config.api_url.as_str(), "https://api.digitalocean.com/");
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = Config::resolve(None, DEFAULT_PORT, DEFAULT_API_URL).unwrap_err();
        assert_eq!(err.to_string(), MISSING_TOKEN_MESSAGE);
    }

    #[test]
    fn test_blank_token_is_an_error() {
        assert!(Config::resolve(Some("   ".to_string()), DEFAULT_PORT, DEFAULT_API_URL).is_err());
    }

    #[test]
    fn test_invalid_api_url() {
        let err = Config::resolve(Some("t".to_string()), DEFAULT_PORT, "not a url").unwrap_err();
        assert!(err.to_string().contains("Invalid API URL"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::resolve(Some("dop_v1_secret".to_string()), 1, DEFAULT_API_URL).unwrap();
        assert!(!format!("{:?}", config).contains("dop_v1_secret"));
    }
}
