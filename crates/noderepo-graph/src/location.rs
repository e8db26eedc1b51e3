//! Node addresses.
//!
//! A location can name a node by path, by identifier, or by both. Callers
//! often hand a processor a partial location (just the identifier, say); the
//! processor answers with the fully resolved one. The two still denote the
//! same node, which is what [`Location::is_same`] checks.

use crate::error::GraphError;
use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque address of a node within a workspace.
///
/// Structural equality (`==`) compares both parts exactly. Node identity is
/// [`Location::is_same`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<Path>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uuid: Option<Uuid>,
}

#[derive(Deserialize)]
struct RawLocation {
    #[serde(default)]
    path: Option<Path>,
    #[serde(default)]
    uuid: Option<Uuid>,
}

impl TryFrom<RawLocation> for Location {
    type Error = GraphError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(raw.path, raw.uuid)
    }
}

impl Location {
    /// Build a location from optional parts; at least one must be present.
    pub fn new(path: Option<Path>, uuid: Option<Uuid>) -> Result<Self, GraphError> {
        if path.is_none() && uuid.is_none() {
            return Err(GraphError::MissingIdentity);
        }
        Ok(Self { path, uuid })
    }

    pub fn at_path(path: Path) -> Self {
        Self {
            path: Some(path),
            uuid: None,
        }
    }

    pub fn with_uuid(uuid: Uuid) -> Self {
        Self {
            path: None,
            uuid: Some(uuid),
        }
    }

    /// A fully resolved location carrying both path and identifier.
    pub fn resolved(path: Path, uuid: Uuid) -> Self {
        Self {
            path: Some(path),
            uuid: Some(uuid),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    pub fn has_uuid(&self) -> bool {
        self.uuid.is_some()
    }

    /// Copy of this location with the path set (or replaced).
    pub fn with_path(&self, path: Path) -> Self {
        Self {
            path: Some(path),
            uuid: self.uuid,
        }
    }

    /// Copy of this location with the identifier set (or replaced).
    pub fn with_identifier(&self, uuid: Uuid) -> Self {
        Self {
            path: self.path.clone(),
            uuid: Some(uuid),
        }
    }

    /// Whether `other` denotes the same node.
    ///
    /// Identifiers win when both sides carry one; paths must then also agree
    /// if both sides carry a path. Without a shared identifier, both paths
    /// must be present and equal. Anything else is not provably the same.
    pub fn is_same(&self, other: &Location) -> bool {
        match (self.uuid, other.uuid) {
            (Some(mine), Some(theirs)) => {
                mine == theirs
                    && match (&self.path, &other.path) {
                        (Some(a), Some(b)) => a == b,
                        _ => true,
                    }
            }
            _ => match (&self.path, &other.path) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// [`Location::is_same`] against a possibly absent location; absent is
    /// never the same node.
    pub fn is_same_opt(&self, other: Option<&Location>) -> bool {
        other.is_some_and(|other| self.is_same(other))
    }
}

impl From<Path> for Location {
    fn from(path: Path) -> Self {
        Self::at_path(path)
    }
}

impl From<Uuid> for Location {
    fn from(uuid: Uuid) -> Self {
        Self::with_uuid(uuid)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, &self.uuid) {
            (Some(path), Some(uuid)) => write!(f, "{path} ({uuid})"),
            (Some(path), None) => write!(f, "{path}"),
            (None, Some(uuid)) => write!(f, "({uuid})"),
            (None, None) => write!(f, "<unaddressed>"),
        }
    }
}
