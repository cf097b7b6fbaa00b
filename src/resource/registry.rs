//! Resource Registry
//!
//! Static definitions of the DigitalOcean collections the exporter reads.

/// Resource definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDef {
    /// Short key used in log lines
    pub key: &'static str,
    /// API path relative to the base URL
    pub path: &'static str,
    /// Top-level field of the response holding the item array
    pub response_path: &'static str,
    /// Whether the endpoint is walked with `page`/`per_page`
    pub paginated: bool,
}

pub const PROJECTS: ResourceDef = ResourceDef {
    key: "projects",
    path: "/v2/projects",
    response_path: "projects",
    paginated: false,
};

pub const DROPLETS: ResourceDef = ResourceDef {
    key: "droplets",
    path: "/v2/droplets",
    response_path: "droplets",
    paginated: true,
};

pub const DATABASES: ResourceDef = ResourceDef {
    key: "databases",
    path: "/v2/databases",
    response_path: "databases",
    paginated: false,
};

pub const VOLUMES: ResourceDef = ResourceDef {
    key: "volumes",
    path: "/v2/volumes",
    response_path: "volumes",
    paginated: true,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_droplets_and_volumes_paginate() {
        let paginated: Vec<&str> = [PROJECTS, DROPLETS, DATABASES, VOLUMES]
            .iter()
            .filter(|r| r.paginated)
            .map(|r| r.key)
            .collect();
        assert_eq!(paginated, vec!["droplets", "volumes"]);
    }

    #[test]
    fn test_response_path_matches_key() {
        for resource in [PROJECTS, DROPLETS, DATABASES, VOLUMES] {
            assert_eq!(resource.key, resource.response_path);
            assert!(resource.path.ends_with(resource.key));
        }
    }
}
