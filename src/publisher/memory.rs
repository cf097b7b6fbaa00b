//! In-memory publisher
//!
//! Keeps the latest value per (gauge, label tuple). Useful for dry runs and
//! for asserting what a poll cycle published.

use super::{labels_match, GaugeDef, MetricsPublisher};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type Series = (&'static str, Vec<String>);

#[derive(Debug, Default)]
pub struct MemoryPublisher {
    series: Mutex<HashMap<Series, f64>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Series, f64>> {
        // inserts are single operations, so a poisoned map is still consistent
        self.series.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Latest value of one series
    pub fn get(&self, gauge: &GaugeDef, label_values: &[&str]) -> Option<f64> {
        let key = (
            gauge.name,
            label_values.iter().map(|s| s.to_string()).collect(),
        );
        self.lock().get(&key).copied()
    }

    /// Number of distinct series recorded for a gauge
    pub fn series_count(&self, gauge: &GaugeDef) -> usize {
        self.lock().keys().filter(|(name, _)| *name == gauge.name).count()
    }

    /// Label tuples recorded for a gauge, sorted
    pub fn label_sets(&self, gauge: &GaugeDef) -> Vec<Vec<String>> {
        let mut sets: Vec<Vec<String>> = self
            .lock()
            .keys()
            .filter(|(name, _)| *name == gauge.name)
            .map(|(_, labels)| labels.clone())
            .collect();
        sets.sort();
        sets
    }
}

impl MetricsPublisher for MemoryPublisher {
    fn set_gauge(&self, gauge: &GaugeDef, label_values: &[String], value: f64) {
        if !labels_match(gauge, label_values) {
            return;
        }
        self.lock()
            .insert((gauge.name, label_values.to_vec()), value);
    }
}
