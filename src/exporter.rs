//! Poll loop
//!
//! One cycle runs the droplet, database and volume passes in order. Each
//! pass fetches its collection, estimates costs and overwrites the gauge
//! series for every resource it saw. Nothing is diffed against the previous
//! cycle, so series for deleted resources keep their last value.

use crate::cost::{database_cost, extract_role, instance_cost, volume_cost, PriceTable};
use crate::digitalocean::client::DoClient;
use crate::digitalocean::projects::resolve_projects;
use crate::publisher::{GaugeDef, MetricsPublisher, DATABASE_COST, DROPLET_COST, VOLUME_COST};
use crate::resource::{
    decode_records, fetch_all, DatabaseCluster, Droplet, Volume, DATABASES, DROPLETS, VOLUMES,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Pause between poll cycles
pub const POLL_INTERVAL: Duration = Duration::from_secs(600);

/// Result of one publish pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// Records returned by the API
    pub fetched: usize,
    /// Series set on the publisher
    pub published: usize,
    /// Records dropped (malformed, unpriced, or invalid cost)
    pub skipped: usize,
    /// False when any request of the pass failed
    pub complete: bool,
}

/// Result of one full cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub droplets: PassSummary,
    pub databases: PassSummary,
    pub volumes: PassSummary,
}

/// Fetch, estimate and publish loop
pub struct Exporter {
    client: DoClient,
    publisher: Arc<dyn MetricsPublisher>,
    prices: PriceTable,
}

impl Exporter {
    pub fn new(client: DoClient, publisher: Arc<dyn MetricsPublisher>) -> Self {
        Self {
            client,
            publisher,
            prices: PriceTable::default(),
        }
    }

    /// Replace the database price table
    pub fn with_prices(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    /// Publish one cost sample, refusing negative or non-finite values
    fn publish(&self, gauge: &GaugeDef, labels: Vec<String>, cost: f64) -> bool {
        if !cost.is_finite() || cost < 0.0 {
            tracing::warn!("Not publishing {} for {:?}: invalid cost {}", gauge.name, labels, cost);
            return false;
        }
        self.publisher.set_gauge(gauge, &labels, cost);
        true
    }

    pub async fn publish_droplets(&self) -> PassSummary {
        let projects = resolve_projects(&self.client).await;
        tracing::debug!("Resolved {} project name(s)", projects.len());

        let report = fetch_all(&self.client, &DROPLETS).await;
        let mut summary = PassSummary {
            fetched: report.items.len(),
            complete: report.is_complete(),
            ..Default::default()
        };

        let droplets: Vec<Droplet> = decode_records("droplet", report.items);
        summary.skipped = summary.fetched - droplets.len();

        for droplet in &droplets {
            let labels = vec![
                droplet.name.clone(),
                projects.project_for(&droplet.tags),
                droplet.region_label(),
                droplet.size_label(),
                droplet.tags_label(),
                extract_role(&droplet.tags),
            ];
            if self.publish(&DROPLET_COST, labels, instance_cost(droplet)) {
                summary.published += 1;
            } else {
                summary.skipped += 1;
            }
        }

        summary
    }

    pub async fn publish_databases(&self) -> PassSummary {
        let report = fetch_all(&self.client, &DATABASES).await;
        let mut summary = PassSummary {
            fetched: report.items.len(),
            complete: report.is_complete(),
            ..Default::default()
        };

        let databases: Vec<DatabaseCluster> = decode_records("database", report.items);
        summary.skipped = summary.fetched - databases.len();

        for db in &databases {
            let Some(cost) = database_cost(db, &self.prices) else {
                tracing::debug!("No price for database {} of size {}", db.name, db.size);
                summary.skipped += 1;
                continue;
            };
            let labels = vec![
                db.name.clone(),
                db.engine.clone(),
                db.region.clone(),
                db.size.clone(),
                db.node_count().to_string(),
            ];
            if self.publish(&DATABASE_COST, labels, cost) {
                summary.published += 1;
            } else {
                summary.skipped += 1;
            }
        }

        summary
    }

    pub async fn publish_volumes(&self) -> PassSummary {
        let report = fetch_all(&self.client, &VOLUMES).await;
        let mut summary = PassSummary {
            fetched: report.items.len(),
            complete: report.is_complete(),
            ..Default::default()
        };

        let volumes: Vec<Volume> = decode_records("volume", report.items);
        summary.skipped = summary.fetched - volumes.len();

        for volume in &volumes {
            let labels = vec![
                volume.name.clone(),
                volume.region.slug.clone(),
                volume.size_gigabytes.to_string(),
            ];
            if self.publish(&VOLUME_COST, labels, volume_cost(volume)) {
                summary.published += 1;
            } else {
                summary.skipped += 1;
            }
        }

        summary
    }

    /// Run the droplet, database and volume passes once
    pub async fn run_cycle(&self) -> CycleSummary {
        let summary = CycleSummary {
            droplets: self.publish_droplets().await,
            databases: self.publish_databases().await,
            volumes: self.publish_volumes().await,
        };

        tracing::info!(
            "Poll cycle done: droplets {}/{}, databases {}/{}, volumes {}/{} published",
            summary.droplets.published,
            summary.droplets.fetched,
            summary.databases.published,
            summary.databases.fetched,
            summary.volumes.published,
            summary.volumes.fetched,
        );

        summary
    }

    /// Run cycles separated by `interval` until `cancel` fires
    ///
    /// A cycle in progress always completes; cancellation is observed while
    /// sleeping.
    pub async fn run(&self, interval: Duration, cancel: CancellationToken) {
        loop {
            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = cancel.cancelled() => {
                    tracing::info!("Poll loop stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::MemoryPublisher;

    // Nothing listens on port 9 locally, so every request fails fast
    fn unreachable_exporter(publisher: Arc<MemoryPublisher>) -> Exporter {
        let client = DoClient::new("token", "http://127.0.0.1:9".parse().unwrap()).unwrap();
        Exporter::new(client, publisher)
    }

    #[test]
    fn test_publish_rejects_invalid_costs() {
        let publisher = Arc::new(MemoryPublisher::new());
        let exporter = unreachable_exporter(publisher.clone());
        let labels = || vec!["v".to_string(), "fra1".to_string(), "1".to_string()];

        assert!(exporter.publish(&VOLUME_COST, labels(), 0.0));
        assert!(!exporter.publish(&VOLUME_COST, labels(), -1.0));
        assert!(!exporter.publish(&VOLUME_COST, labels(), f64::NAN));
        assert_eq!(publisher.get(&VOLUME_COST, &["v", "fra1", "1"]), Some(0.0));
    }

    #[tokio::test]
    async fn test_cycle_with_unreachable_api_publishes_nothing() {
        let publisher = Arc::new(MemoryPublisher::new());
        let exporter = unreachable_exporter(publisher.clone());

        let summary = exporter.run_cycle().await;
        assert!(!summary.droplets.complete);
        assert!(!summary.databases.complete);
        assert!(!summary.volumes.complete);
        assert_eq!(summary.droplets.published + summary.volumes.published, 0);
        assert_eq!(publisher.series_count(&DROPLET_COST), 0);
    }

    #[tokio::test]
    async fn test_run_stops_when_cancelled() {
        let publisher = Arc::new(MemoryPublisher::new());
        let exporter = unreachable_exporter(publisher);
        let cancel = CancellationToken::new();
        cancel.cancel();

        tokio::time::timeout(
            Duration::from_secs(30),
            exporter.run(POLL_INTERVAL, cancel),
        )
        .await
        .expect("run should return after one cycle once cancelled");
    }
}
