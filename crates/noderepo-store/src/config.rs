//! TOML configuration for a [`crate::MemoryRepository`].
//!
//! ```toml
//! default_workspace = "default"
//!
//! [[workspace]]
//! name = "default"
//!
//! [[workspace.node]]
//! path = "/articles"
//! uuid = "5b1c3d6e-0f7a-4b8e-9c2d-1e3f5a7b9c0d"
//! properties = { title = "Articles", tags = ["news", "weekly"], count = 2 }
//! ```
//!
//! Nodes are inserted in file order, so parents must come before children.

use crate::error::ConfigError;
use noderepo_graph::{Name, Path, Property, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path as FsPath;
use uuid::Uuid;

pub const DEFAULT_WORKSPACE: &str = "default";

fn default_workspace_name() -> String {
    DEFAULT_WORKSPACE.to_string()
}

/// Store-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Workspace created even when no `[[workspace]]` table names it.
    #[serde(default = "default_workspace_name")]
    pub default_workspace: String,

    #[serde(default, rename = "workspace", skip_serializing_if = "Vec::is_empty")]
    pub workspaces: Vec<WorkspaceConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_workspace: default_workspace_name(),
            workspaces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    pub name: String,
    #[serde(default, rename = "node", skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeConfig>,
}

/// A node to create at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    pub path: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SeedValues>,
}

/// One TOML value or an array of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedValues {
    One(SeedValue),
    Many(Vec<SeedValue>),
}

/// A TOML scalar usable as a property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedValue {
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
}

impl From<&SeedValue> for Value {
    fn from(seed: &SeedValue) -> Self {
        match seed {
            SeedValue::Boolean(b) => Value::Boolean(*b),
            SeedValue::Long(n) => Value::Long(*n),
            SeedValue::Double(n) => Value::Double(*n),
            SeedValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl NodeConfig {
    /// Seed properties in name order.
    pub fn properties(&self) -> Result<Vec<Property>, ConfigError> {
        self.properties
            .iter()
            .map(|(raw_name, seed)| {
                let name = Name::parse(raw_name)?;
                let values: Vec<Value> = match seed {
                    SeedValues::One(value) => vec![value.into()],
                    SeedValues::Many(values) => values.iter().map(Value::from).collect(),
                };
                Ok::<_, ConfigError>(Property::new(name, values))
            })
            .collect()
    }
}

impl StoreConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<inline>")
    }

    pub fn load(path: impl AsRef<FsPath>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject duplicate or blank workspace names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_workspace.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_workspace must not be blank".to_string(),
            ));
        }
        let mut seen = std::collections::BTreeSet::new();
        for workspace in &self.workspaces {
            if workspace.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "workspace names must not be blank".to_string(),
                ));
            }
            if !seen.insert(workspace.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "workspace \"{}\" is declared more than once",
                    workspace.name
                )));
            }
        }
        Ok(())
    }
}
