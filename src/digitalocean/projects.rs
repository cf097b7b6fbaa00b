//! DigitalOcean Projects
//!
//! Lists projects and matches droplets to them. A droplet belongs to a
//! project when one of its tags equals the project name, ignoring case.

use super::client::DoClient;
use crate::resource::{fetch_all, PROJECTS};
use crate::UNKNOWN;
use serde_json::Value;
use std::collections::HashSet;

/// Project information
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
}

impl Project {
    fn from_value(value: &Value) -> Option<Self> {
        value.get("name").and_then(|v| v.as_str()).map(|name| Self {
            name: name.to_string(),
        })
    }
}

/// Lowercase project names used for tag matching
#[derive(Debug, Clone, Default)]
pub struct ProjectSet {
    names: HashSet<String>,
}

impl ProjectSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// First tag, in list order, naming a known project
    pub fn match_tags(&self, tags: &[String]) -> Option<&str> {
        tags.iter()
            .find_map(|tag| self.names.get(&tag.to_lowercase()))
            .map(String::as_str)
    }

    /// Project label for a droplet with these tags
    pub fn project_for(&self, tags: &[String]) -> String {
        self.match_tags(tags).unwrap_or(UNKNOWN).to_string()
    }
}

/// List all projects visible to the token; empty when the call fails
pub async fn list_projects(client: &DoClient) -> Vec<Project> {
    let report = fetch_all(client, &PROJECTS).await;
    report.items.iter().filter_map(Project::from_value).collect()
}

/// Fetch projects and build the matching set
pub async fn resolve_projects(client: &DoClient) -> ProjectSet {
    let projects = list_projects(client).await;
    ProjectSet::new(projects.iter().map(|p| p.name.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_match_is_case_insensitive_and_exact() {
        let projects = ProjectSet::new(["web", "db"]);
        assert_eq!(projects.match_tags(&tags(&["WEB", "role:api"])), Some("web"));
        assert_eq!(projects.match_tags(&tags(&["webserver"])), None);
        assert_eq!(projects.match_tags(&tags(&["role:db"])), None);
    }

    #[test]
    fn test_first_matching_tag_wins() {
        let projects = ProjectSet::new(["Web", "DB"]);
        assert_eq!(projects.project_for(&tags(&["env:prod", "db", "web"])), "db");
    }

    #[test]
    fn test_unknown_when_no_match() {
        let projects = ProjectSet::new(["web"]);
        assert_eq!(projects.project_for(&tags(&["api"])), UNKNOWN);
        assert_eq!(projects.project_for(&[]), UNKNOWN);
        assert_eq!(ProjectSet::default().project_for(&tags(&["web"])), UNKNOWN);
    }

    #[test]
    fn test_project_from_value_requires_name() {
        assert_eq!(
            Project::from_value(&json!({"id": "4e1b", "name": "Billing"}))
                .unwrap()
                .name,
            "Billing"
        );
        assert!(Project::from_value(&json!({"id": "4e1b"})).is_none());
    }
}
