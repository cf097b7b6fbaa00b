//! Resource abstraction layer
//!
//! # Architecture
//!
//! - [`registry`] - Static definitions of the collections the exporter reads
//! - [`fetcher`] - Fetches collections with page-number pagination
//! - [`model`] - Typed records decoded from the raw JSON items
//!
//! # Example
//!
//! ```ignore
//! use do_cost_exporter::resource::{fetch_all, decode_records, Droplet, DROPLETS};
//!
//! async fn list_droplets(client: &DoClient) -> Vec<Droplet> {
//!     let report = fetch_all(client, &DROPLETS).await;
//!     decode_records("droplet", report.items)
//! }
//! ```

mod fetcher;
mod model;
mod registry;

pub use fetcher::{fetch_all, FetchReport, PER_PAGE};
pub use model::*;
pub use registry::*;
