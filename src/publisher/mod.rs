//! Metric publishing
//!
//! Gauge definitions are fixed at compile time. Publishers are injected
//! into the exporter instead of registering against a process-global
//! recorder.
//!
//! - [`prometheus`] - Publisher backed by a Prometheus recorder
//! - [`memory`] - In-memory publisher for inspecting published values

pub mod memory;
pub mod prometheus;

pub use memory::MemoryPublisher;
pub use prometheus::PrometheusPublisher;

/// Gauge name, help text and ordered label names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeDef {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

pub const DROPLET_COST: GaugeDef = GaugeDef {
    name: "droplet_cost_monthly",
    help: "Monthly cost of the droplet",
    labels: &["droplet_name", "project", "region", "size", "tags", "role"],
};

pub const DATABASE_COST: GaugeDef = GaugeDef {
    name: "database_cost_monthly",
    help: "Monthly cost of the database cluster",
    labels: &["database_name", "engine", "region", "size", "num_nodes"],
};

pub const VOLUME_COST: GaugeDef = GaugeDef {
    name: "volume_cost_monthly",
    help: "Monthly cost of the volume",
    labels: &["volume_name", "region", "size_gigabytes"],
};

pub const ALL_GAUGES: &[GaugeDef] = &[DROPLET_COST, DATABASE_COST, VOLUME_COST];

/// Sink for gauge observations
pub trait MetricsPublisher: Send + Sync {
    /// Register help text for a gauge
    fn describe(&self, _gauge: &GaugeDef) {}

    /// Set the series identified by `label_values` to `value`
    ///
    /// `label_values` must line up with `gauge.labels`.
    fn set_gauge(&self, gauge: &GaugeDef, label_values: &[String], value: f64);
}

/// Guard shared by publishers against malformed label tuples
pub(crate) fn labels_match(gauge: &GaugeDef, label_values: &[String]) -> bool {
    if label_values.len() == gauge.labels.len() {
        return true;
    }
    tracing::error!(
        "Dropping {} sample: expected {} label values, got {}",
        gauge.name,
        gauge.labels.len(),
        label_values.len()
    );
    false
}
