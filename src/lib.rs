//! DigitalOcean cost exporter
//!
//! Polls the DigitalOcean API for droplets, managed databases and volumes,
//! estimates a monthly cost for each one and publishes the results as
//! Prometheus gauges.
//!
//! # Module Structure
//!
//! - [`config`] - Validated runtime configuration
//! - [`digitalocean`] - REST client and project resolution
//! - [`resource`] - Resource definitions, paginated fetching and typed records
//! - [`cost`] - Monthly cost estimation and role extraction
//! - [`publisher`] - Gauge definitions and metric publishers
//! - [`server`] - Prometheus exposition endpoint
//! - [`exporter`] - The poll loop tying everything together

pub mod config;
pub mod cost;
pub mod digitalocean;
pub mod exporter;
pub mod publisher;
pub mod resource;
pub mod server;

/// Label value used when a project or role cannot be derived
pub const UNKNOWN: &str = "Unknown";
