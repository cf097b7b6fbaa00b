//! DigitalOcean Client
//!
//! Main client for the DigitalOcean v2 API, combining the bearer token,
//! API base URL and HTTP functionality.

use super::http::DoHttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;
use url::Url;

/// Production API endpoint
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com";

/// Main DigitalOcean client
#[derive(Clone)]
pub struct DoClient {
    http: DoHttpClient,
    token: String,
    base_url: Url,
}

impl DoClient {
    /// Create a new client for the given token and API base URL
    pub fn new(token: &str, base_url: Url) -> Result<Self> {
        let http = DoHttpClient::new()?;

        Ok(Self {
            http,
            token: token.to_string(),
            base_url,
        })
    }

    /// Build an API URL from a path such as `/v2/droplets` plus query pairs
    pub fn api_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .with_context(|| format!("Invalid API path: {}", path))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Make a GET request to the DigitalOcean API
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = self.api_url(path, query)?;
        self.http.get(url, &self.token).await
    }
}

impl fmt::Debug for DoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}
