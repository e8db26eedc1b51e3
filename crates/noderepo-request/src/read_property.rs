//! Reading one named property from one node.

use crate::error::RequestError;
use crate::request::{CacheKey, Cacheable, Request};
use crate::resolved::{ActualLocation, WriteOnce};
use noderepo_graph::{Location, Name, Property};
use std::fmt;

/// A read-only, cacheable request for a single property of a node.
///
/// The processor records two outcomes, once each: the property that was
/// found (or its absence) and the resolved location of the node.
#[derive(Debug, Clone)]
pub struct ReadPropertyRequest {
    on: Location,
    workspace_name: String,
    property_name: Name,
    property: WriteOnce<Option<Property>>,
    actual_location: WriteOnce<ActualLocation>,
}

impl ReadPropertyRequest {
    pub fn new(on: Location, workspace_name: impl Into<String>, property_name: Name) -> Self {
        Self {
            on,
            workspace_name: workspace_name.into(),
            property_name,
            property: WriteOnce::new("property"),
            actual_location: WriteOnce::new("actual location"),
        }
    }

    /// Builder for callers whose inputs may be missing; `build` reports the
    /// first absent argument.
    pub fn builder() -> ReadPropertyRequestBuilder {
        ReadPropertyRequestBuilder::default()
    }

    pub fn on(&self) -> &Location {
        &self.on
    }

    pub fn in_workspace(&self) -> &str {
        &self.workspace_name
    }

    /// Name of the property to read.
    pub fn named(&self) -> &Name {
        &self.property_name
    }

    /// The property that was read, or `None` if it has not been read yet or
    /// did not exist on the node. See [`ReadPropertyRequest::was_read`].
    pub fn property(&self) -> Option<&Property> {
        self.property.get().and_then(Option::as_ref)
    }

    /// Whether the processor has recorded a read outcome, including absence.
    pub fn was_read(&self) -> bool {
        self.property.is_set()
    }

    /// Record the property read from the store; `None` means the node has no
    /// such property.
    pub fn set_property(&mut self, property: Option<Property>) -> Result<(), RequestError> {
        if let Some(found) = &property
            && found.name() != &self.property_name
        {
            return Err(RequestError::PropertyNameMismatch {
                expected: self.property_name.clone(),
                actual: found.name().clone(),
            });
        }
        self.property.set(property)
    }

    /// Record the resolved location of the node whose property was read.
    ///
    /// `actual` must denote the same node as [`ReadPropertyRequest::on`] and
    /// must carry a path.
    pub fn set_actual_location_of_node(&mut self, actual: Location) -> Result<(), RequestError> {
        let actual = ActualLocation::resolve(&self.on, actual)?;
        self.actual_location.set(actual)
    }

    pub fn actual_location_of_node(&self) -> Option<&Location> {
        self.actual_location.get().map(ActualLocation::location)
    }
}

impl Request for ReadPropertyRequest {
    fn is_read_only(&self) -> bool {
        true
    }

    fn is_cacheable(&self) -> bool {
        true
    }

    fn on(&self) -> &Location {
        &self.on
    }

    fn in_workspace(&self) -> &str {
        &self.workspace_name
    }

    fn actual_location_of_node(&self) -> Option<&Location> {
        ReadPropertyRequest::actual_location_of_node(self)
    }
}

impl Cacheable for ReadPropertyRequest {
    fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            self.workspace_name.clone(),
            self.on.clone(),
            Some(self.property_name.clone()),
        )
    }
}

/// Equality reflects the request, not its outcome.
impl PartialEq for ReadPropertyRequest {
    fn eq(&self, other: &Self) -> bool {
        self.on == other.on
            && self.property_name == other.property_name
            && self.workspace_name == other.workspace_name
    }
}

impl fmt::Display for ReadPropertyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read {} property on {} in the \"{}\" workspace",
            self.property_name, self.on, self.workspace_name
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadPropertyRequestBuilder {
    on: Option<Location>,
    workspace_name: Option<String>,
    property_name: Option<Name>,
}

impl ReadPropertyRequestBuilder {
    pub fn on(mut self, on: impl Into<Option<Location>>) -> Self {
        self.on = on.into();
        self
    }

    pub fn in_workspace(mut self, workspace_name: Option<impl Into<String>>) -> Self {
        self.workspace_name = workspace_name.map(Into::into);
        self
    }

    pub fn named(mut self, property_name: impl Into<Option<Name>>) -> Self {
        self.property_name = property_name.into();
        self
    }

    pub fn build(self) -> Result<ReadPropertyRequest, RequestError> {
        let on = self.on.ok_or_else(|| RequestError::missing("on"))?;
        let property_name = self
            .property_name
            .ok_or_else(|| RequestError::missing("propertyName"))?;
        let workspace_name = self
            .workspace_name
            .ok_or_else(|| RequestError::missing("workspaceName"))?;
        Ok(ReadPropertyRequest::new(on, workspace_name, property_name))
    }
}
