//! The contract shared by all requests.

use crate::read_property::ReadPropertyRequest;
use crate::update_properties::UpdatePropertiesRequest;
use noderepo_graph::{Location, Name};
use sha2::{Digest, Sha256};
use std::fmt;

/// Classification and identity every request exposes to a dispatcher.
///
/// `is_read_only` is fixed per request type; a dispatcher uses it to pick a
/// write-barrier policy. Cacheable requests are a subset of read-only ones.
pub trait Request: fmt::Display + Send + Sync {
    fn is_read_only(&self) -> bool;

    fn is_cacheable(&self) -> bool {
        false
    }

    /// Location of the node the request targets, as supplied by the caller.
    fn on(&self) -> &Location;

    /// Name of the workspace the request is scoped to.
    fn in_workspace(&self) -> &str;

    /// The resolved location recorded by the processor, if any yet.
    fn actual_location_of_node(&self) -> Option<&Location>;
}

/// A read-only request whose result an external cache may memoize.
pub trait Cacheable: Request {
    fn cache_key(&self) -> CacheKey;
}

/// Identity of a cacheable result: workspace, node, and optionally a single
/// property name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    workspace: String,
    location: Location,
    property: Option<Name>,
}

impl CacheKey {
    pub fn new(workspace: impl Into<String>, location: Location, property: Option<Name>) -> Self {
        Self {
            workspace: workspace.into(),
            location,
            property,
        }
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn property(&self) -> Option<&Name> {
        self.property.as_ref()
    }

    /// Stable sha256 hex digest of the key, for caches keyed by string.
    ///
    /// Fields are fed in a fixed order; absent parts are skipped.
    pub fn digest(&self) -> String {
        let mut hasher = KeyHasher::default().field("workspace", &self.workspace);
        if let Some(path) = self.location.path() {
            hasher = hasher.field("path", &path.to_string());
        }
        if let Some(uuid) = self.location.uuid() {
            hasher = hasher.field("uuid", &uuid.to_string());
        }
        if let Some(property) = &self.property {
            hasher = hasher.field("property", &property.to_string());
        }
        hasher.finish()
    }
}

#[derive(Default)]
struct KeyHasher {
    hasher: Sha256,
}

impl KeyHasher {
    fn field(mut self, name: &str, value: &str) -> Self {
        self.hasher.update(name.as_bytes());
        self.hasher.update(b":");
        self.hasher.update(value.as_bytes());
        self.hasher.update(b"\n");
        self
    }

    fn finish(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

/// Any request a processor knows how to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphRequest {
    ReadProperty(ReadPropertyRequest),
    UpdateProperties(UpdatePropertiesRequest),
}

impl GraphRequest {
    fn as_request(&self) -> &dyn Request {
        match self {
            GraphRequest::ReadProperty(request) => request,
            GraphRequest::UpdateProperties(request) => request,
        }
    }
}

impl Request for GraphRequest {
    fn is_read_only(&self) -> bool {
        self.as_request().is_read_only()
    }

    fn is_cacheable(&self) -> bool {
        self.as_request().is_cacheable()
    }

    fn on(&self) -> &Location {
        self.as_request().on()
    }

    fn in_workspace(&self) -> &str {
        self.as_request().in_workspace()
    }

    fn actual_location_of_node(&self) -> Option<&Location> {
        self.as_request().actual_location_of_node()
    }
}

impl fmt::Display for GraphRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_request(), f)
    }
}

impl From<ReadPropertyRequest> for GraphRequest {
    fn from(request: ReadPropertyRequest) -> Self {
        GraphRequest::ReadProperty(request)
    }
}

impl From<UpdatePropertiesRequest> for GraphRequest {
    fn from(request: UpdatePropertiesRequest) -> Self {
        GraphRequest::UpdateProperties(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noderepo_graph::{Path, Property};

    fn location(raw: &str) -> Location {
        Location::at_path(Path::parse(raw).expect("valid path"))
    }

    fn name(raw: &str) -> Name {
        Name::local(raw).expect("valid name")
    }

    #[test]
    fn classification_is_fixed_per_type() {
        let read: GraphRequest =
            ReadPropertyRequest::new(location("/a"), "default", name("title")).into();
        assert!(read.is_read_only());
        assert!(read.is_cacheable());

        let update: GraphRequest = UpdatePropertiesRequest::new(
            location("/a"),
            "default",
            [Property::single(name("title"), "x")],
        )
        .expect("valid update")
        .into();
        assert!(!update.is_read_only());
        assert!(!update.is_cacheable());
        assert_eq!(update.in_workspace(), "default");
    }

    #[test]
    fn cache_key_digest_is_stable_and_discriminating() {
        let a = CacheKey::new("default", location("/a"), Some(name("title")));
        let same = CacheKey::new("default", location("/a"), Some(name("title")));
        assert_eq!(a.digest(), same.digest());
        assert_eq!(a.digest().len(), 64);

        let other_ws = CacheKey::new("other", location("/a"), Some(name("title")));
        let other_prop = CacheKey::new("default", location("/a"), Some(name("body")));
        let whole_node = CacheKey::new("default", location("/a"), None);
        assert_ne!(a.digest(), other_ws.digest());
        assert_ne!(a.digest(), other_prop.digest());
        assert_ne!(a.digest(), whole_node.digest());
    }
}
