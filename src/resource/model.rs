//! Typed views of DigitalOcean records
//!
//! Only the fields the exporter reads are modelled; everything else in the
//! API payload is ignored.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Compute instance
#[derive(Debug, Clone, Deserialize)]
pub struct Droplet {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub region: DropletRegion,
    pub size: DropletSize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DropletRegion {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DropletSize {
    pub slug: String,
    pub vcpus: u64,
    /// Memory in MB
    pub memory: u64,
    /// Disk in GB
    pub disk: u64,
    pub price_monthly: f64,
}

impl Droplet {
    /// `"New York 1 (nyc1)"`
    pub fn region_label(&self) -> String {
        format!("{} ({})", self.region.name, self.region.slug)
    }

    /// `"s-1vcpu-1gb (vCPUs: 1, RAM: 1024 MB, Disk: 25 GB)"`
    pub fn size_label(&self) -> String {
        format!(
            "{} (vCPUs: {}, RAM: {} MB, Disk: {} GB)",
            self.size.slug, self.size.vcpus, self.size.memory, self.size.disk
        )
    }

    /// Tags joined with `", "`, or `"None"` when untagged
    pub fn tags_label(&self) -> String {
        if self.tags.is_empty() {
            "None".to_string()
        } else {
            self.tags.join(", ")
        }
    }
}

/// Managed database cluster
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseCluster {
    pub name: String,
    pub engine: String,
    pub region: String,
    /// Size-class slug, e.g. `db-s-1vcpu-1gb`
    pub size: String,
    #[serde(default)]
    pub num_nodes: Option<u32>,
}

impl DatabaseCluster {
    /// Node count, defaulting to a single node when the API omits it
    pub fn node_count(&self) -> u32 {
        self.num_nodes.unwrap_or(1)
    }
}

/// Block storage volume
#[derive(Debug, Clone, Deserialize)]
pub struct Volume {
    pub name: String,
    pub region: VolumeRegion,
    pub size_gigabytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VolumeRegion {
    pub slug: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode raw records, skipping (and logging) those missing required fields
pub fn decode_records<T: DeserializeOwned>(kind: &str, items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed {} record: {}", kind, e);
                None
            }
        })
        .collect()
}
