//! Prometheus publisher
//!
//! Owns its own `PrometheusRecorder` rather than installing a global one,
//! so several publishers can coexist in one process (tests do this).

use super::{labels_match, GaugeDef, MetricsPublisher, ALL_GAUGES};
use metrics::{Key, KeyName, Label, Level, Metadata, Recorder, SharedString};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

/// Publisher writing into a Prometheus registry
pub struct PrometheusPublisher {
    recorder: PrometheusRecorder,
}

impl PrometheusPublisher {
    /// Build a recorder with every exporter gauge described
    pub fn new() -> Self {
        let publisher = Self {
            recorder: PrometheusBuilder::new().build_recorder(),
        };
        for gauge in ALL_GAUGES {
            publisher.describe(gauge);
        }
        publisher
    }

    /// Handle used by the exposition endpoint
    pub fn handle(&self) -> PrometheusHandle {
        self.recorder.handle()
    }

    /// Render all series in Prometheus text format
    pub fn render(&self) -> String {
        self.recorder.handle().render()
    }
}

impl Default for PrometheusPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsPublisher for PrometheusPublisher {
    fn describe(&self, gauge: &GaugeDef) {
        self.recorder.describe_gauge(
            KeyName::from(gauge.name),
            None,
            SharedString::from(gauge.help),
        );
    }

    fn set_gauge(&self, gauge: &GaugeDef, label_values: &[String], value: f64) {
        if !labels_match(gauge, label_values) {
            return;
        }

        let labels: Vec<Label> = gauge
            .labels
            .iter()
            .zip(label_values)
            .map(|(name, value)| Label::new(*name, value.clone()))
            .collect();
        let key = Key::from_parts(gauge.name, labels);
        let metadata = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

        self.recorder.register_gauge(&key, &metadata).set(value);
    }
}
