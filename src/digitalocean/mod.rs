//! DigitalOcean API interaction module
//!
//! # Module Structure
//!
//! - [`client`] - Main client holding the token and API base URL
//! - [`http`] - HTTP utilities for REST API calls
//! - [`projects`] - Project listing and tag-based project matching
//!
//! # Example
//!
//! ```ignore
//! use do_cost_exporter::digitalocean::client::DoClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = DoClient::new("dop_v1_...", "https://api.digitalocean.com".parse()?)?;
//!     let droplets = client.get("/v2/droplets", &[("per_page", "200".into())]).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod projects;
