//! Resource Fetcher
//!
//! Fetches DigitalOcean collections with page-number pagination. Failures
//! never propagate: the caller gets whatever was collected plus the error.

use super::registry::ResourceDef;
use crate::digitalocean::client::DoClient;
use serde_json::Value;

/// Page size requested from paginated endpoints
pub const PER_PAGE: usize = 200;

/// Outcome of fetching one collection
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Raw records collected before completion or failure
    pub items: Vec<Value>,
    /// Number of HTTP requests issued
    pub requests: u32,
    /// Set when a request failed; `items` then holds only earlier pages
    pub error: Option<anyhow::Error>,
}

impl FetchReport {
    /// True when every request succeeded
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetch all records of a resource, walking pages when the endpoint paginates
pub async fn fetch_all(client: &DoClient, resource: &ResourceDef) -> FetchReport {
    let report = if resource.paginated {
        fetch_paginated(client, resource).await
    } else {
        fetch_single(client, resource).await
    };

    match &report.error {
        None => tracing::debug!(
            "Fetched {} {} in {} request(s)",
            report.items.len(),
            resource.key,
            report.requests
        ),
        Some(e) => tracing::warn!(
            "Fetching {} failed after {} request(s), keeping {} item(s): {:#}",
            resource.key,
            report.requests,
            report.items.len(),
            e
        ),
    }

    report
}

/// Issue a single request and return its item array
async fn fetch_single(client: &DoClient, resource: &ResourceDef) -> FetchReport {
    let mut report = FetchReport {
        requests: 1,
        ..Default::default()
    };

    match client.get(resource.path, &[]).await {
        Ok(response) => report.items = extract_items(response, resource.response_path),
        Err(e) => report.error = Some(e),
    }

    report
}

/// Walk `page=1..` until a short page or a failed request
async fn fetch_paginated(client: &DoClient, resource: &ResourceDef) -> FetchReport {
    let mut report = FetchReport::default();
    let mut page: u32 = 1;

    loop {
        let query = [("page", page.to_string()), ("per_page", PER_PAGE.to_string())];
        report.requests += 1;

        let response = match client.get(resource.path, &query).await {
            Ok(response) => response,
            Err(e) => {
                report.error = Some(e.context(format!("page {}", page)));
                break;
            }
        };

        let items = extract_items(response, resource.response_path);
        let last_page = items.len() < PER_PAGE;
        report.items.extend(items);

        if last_page {
            break;
        }
        page += 1;
    }

    report
}

/// Take the array stored under `path`, or nothing when it is missing
fn extract_items(mut response: Value, path: &str) -> Vec<Value> {
    match response.get_mut(path).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}
