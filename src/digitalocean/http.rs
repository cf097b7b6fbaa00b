//! HTTP utilities for DigitalOcean REST API calls

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Short operator hint for a failed API status
pub fn status_hint(status: StatusCode) -> &'static str {
    match status.as_u16() {
        401 => "authentication failed, check DO_API_TOKEN",
        403 => "token lacks read scope for this resource",
        404 => "endpoint not found, check the API base URL",
        429 => "rate limit exceeded, data resumes next cycle",
        500..=599 => "DigitalOcean API temporarily unavailable",
        _ => "request rejected",
    }
}

/// HTTP client wrapper for DigitalOcean API calls
#[derive(Clone)]
pub struct DoHttpClient {
    client: Client,
}

impl DoHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("do-cost-exporter/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make an authenticated GET request and parse the JSON body
    pub async fn get(&self, url: Url, token: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::warn!(
                "API error: {} ({}) - {}",
                status,
                status_hint(status),
                sanitize_for_log(&body)
            );
            return Err(anyhow::anyhow!("API request failed: {}", status));
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("bad\nrequest\t!"), "badrequest!");
    }

    #[test]
    fn test_sanitize_respects_char_boundaries() {
        let body = "é".repeat(150);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("300 bytes total"));
    }

    #[test]
    fn test_status_hint() {
        assert!(status_hint(StatusCode::UNAUTHORIZED).contains("DO_API_TOKEN"));
        assert!(status_hint(StatusCode::SERVICE_UNAVAILABLE).contains("unavailable"));
        assert_eq!(status_hint(StatusCode::BAD_REQUEST), "request rejected");
    }
}
