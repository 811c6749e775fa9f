//! Component records as reported by the Nexus REST API.

use serde::{Deserialize, Deserializer, Serialize};

/// One stored component (a single version of one artifact).
///
/// Read-only to NARC: the server owns these records, the engine only
/// groups, orders and deletes them by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryItem {
    /// Opaque component identity used for deletion
    pub id: String,
    /// Repository the component lives in
    #[serde(default, deserialize_with = "null_as_empty")]
    pub repository: String,
    /// Repository format (e.g. `maven2`)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub format: String,
    /// Maven groupId
    #[serde(default, deserialize_with = "null_as_empty")]
    pub group: String,
    /// Maven artifactId
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Raw version string, unparsed
    #[serde(default, deserialize_with = "null_as_empty")]
    pub version: String,
    /// Files belonging to this component
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl RepositoryItem {
    /// Build a maven component record with no assets.
    pub fn new(id: &str, group: &str, name: &str, version: &str) -> Self {
        RepositoryItem {
            id: id.to_string(),
            repository: String::new(),
            format: "maven2".to_string(),
            group: group.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            assets: Vec::new(),
        }
    }

    /// Set the owning repository name
    pub fn in_repository(mut self, repository: &str) -> Self {
        self.repository = repository.to_string();
        self
    }

    /// `group:name:version`, used to identify the component in log records.
    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group, self.name, self.version)
    }
}

/// A single file (jar, pom, checksum) attached to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub download_url: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
