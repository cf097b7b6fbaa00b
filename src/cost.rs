//! Cost Estimation
//!
//! Monthly cost per resource. Droplets carry their own price; database
//! clusters are priced from a static table; volumes use a flat per-GB rate.

use crate::resource::{DatabaseCluster, Droplet, Volume};
use crate::UNKNOWN;
use std::collections::HashMap;

/// Block storage price per GB per month
pub const VOLUME_RATE_PER_GB: f64 = 0.10;

/// Static monthly price per database size-class, per node
const DATABASE_PRICES: &[(&str, f64)] = &[
    ("db-s-1vcpu-1gb", 15.00),
    ("db-s-1vcpu-2gb", 30.00),
    ("db-s-2vcpu-4gb", 60.00),
    ("so1_5-2vcpu-16gb", 212.00),
];

/// Monthly price per node, keyed by size-class slug
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    prices: HashMap<String, f64>,
}

impl PriceTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            prices: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, size_class: &str) -> Option<f64> {
        self.prices.get(size_class).copied()
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new(DATABASE_PRICES.iter().copied())
    }
}

/// Provider-reported monthly price, passed through unchanged
pub fn instance_cost(droplet: &Droplet) -> f64 {
    droplet.size.price_monthly
}

/// Table price times node count; `None` when the size-class is not priced
pub fn database_cost(db: &DatabaseCluster, prices: &PriceTable) -> Option<f64> {
    prices
        .get(&db.size)
        .map(|per_node| per_node * f64::from(db.node_count()))
}

pub fn volume_cost(volume: &Volume) -> f64 {
    volume.size_gigabytes as f64 * VOLUME_RATE_PER_GB
}

/// Role named by the first `role:` tag (case-insensitive), else `"Unknown"`
///
/// The value is everything after the first colon of that tag, trimmed, so
/// `"Role: api-gateway"` yields `"api-gateway"`.
pub fn extract_role(tags: &[String]) -> String {
    tags.iter()
        .find(|tag| tag.to_lowercase().contains("role:"))
        .and_then(|tag| tag.split_once(':'))
        .map(|(_, role)| role.trim().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::VolumeRegion;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn database(size: &str, num_nodes: Option<u32>) -> DatabaseCluster {
        DatabaseCluster {
            name: "pg-main".to_string(),
            engine: "pg".to_string(),
            region: "nyc3".to_string(),
            size: size.to_string(),
            num_nodes,
        }
    }

    #[test]
    fn test_extract_role() {
        assert_eq!(extract_role(&tags(&["env:prod", "Role: api-gateway"])), "api-gateway");
        assert_eq!(extract_role(&tags(&["role:api", "role:db"])), "api");
        assert_eq!(extract_role(&tags(&["env:prod"])), UNKNOWN);
        assert_eq!(extract_role(&[]), UNKNOWN);
    }

    #[test]
    fn test_extract_role_splits_on_first_colon() {
        assert_eq!(extract_role(&tags(&["ROLE:worker:batch"])), "worker:batch");
        // the substring may sit behind another prefix; the split still uses the first colon
        assert_eq!(extract_role(&tags(&["team:role:x"])), "role:x");
        assert_eq!(extract_role(&tags(&["role:"])), "");
    }

    #[test]
    fn test_database_cost() {
        let prices = PriceTable::default();
        assert_eq!(database_cost(&database("db-s-1vcpu-2gb", Some(3)), &prices), Some(90.0));
        assert_eq!(database_cost(&database("so1_5-2vcpu-16gb", None), &prices), Some(212.0));
        assert_eq!(database_cost(&database("db-s-8vcpu-32gb", Some(2)), &prices), None);
    }

    #[test]
    fn test_custom_price_table() {
        let prices = PriceTable::new([("gd-2vcpu-8gb", 68.0)]);
        assert_eq!(database_cost(&database("gd-2vcpu-8gb", Some(2)), &prices), Some(136.0));
        assert_eq!(database_cost(&database("db-s-1vcpu-1gb", None), &prices), None);
    }

    #[test]
    fn test_volume_cost() {
        let volume = Volume {
            name: "data".to_string(),
            region: VolumeRegion {
                slug: "fra1".to_string(),
            },
            size_gigabytes: 250,
        };
        assert!((volume_cost(&volume) - 25.0).abs() < 1e-9);
    }
}
