//! Replacing a set of named properties on one node, and merging such updates.

use crate::error::RequestError;
use crate::request::Request;
use crate::resolved::{ActualLocation, WriteOnce};
use noderepo_graph::{Location, Name, Property};
use std::collections::BTreeSet;
use std::fmt;
use tracing::trace;

/// A mutating request that sets properties on a node.
///
/// The property list is never empty and keeps insertion order. A property
/// with no values asks the store to remove that property.
#[derive(Debug, Clone)]
pub struct UpdatePropertiesRequest {
    on: Location,
    workspace_name: String,
    properties: Vec<Property>,
    actual_location: WriteOnce<ActualLocation>,
}

impl UpdatePropertiesRequest {
    /// Update with an explicit list of properties; fails if the list is empty.
    pub fn new(
        on: Location,
        workspace_name: impl Into<String>,
        properties: impl Into<Vec<Property>>,
    ) -> Result<Self, RequestError> {
        let properties = properties.into();
        if properties.is_empty() {
            return Err(RequestError::EmptyProperties);
        }
        Ok(Self::from_normalized(on, workspace_name.into(), properties))
    }

    /// Update from any sequence of possibly absent properties.
    ///
    /// Absent entries are dropped and order is preserved; fails if nothing
    /// is left.
    pub fn from_iterable<I, P>(
        on: Location,
        workspace_name: impl Into<String>,
        properties: I,
    ) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Option<Property>>,
    {
        let properties = normalize(properties)?;
        Ok(Self::from_normalized(on, workspace_name.into(), properties))
    }

    /// Update drained from a cursor the caller keeps ownership of.
    ///
    /// Same filtering as [`UpdatePropertiesRequest::from_iterable`]; the
    /// cursor is exhausted afterwards.
    pub fn from_cursor<I, P>(
        on: Location,
        workspace_name: impl Into<String>,
        cursor: &mut I,
    ) -> Result<Self, RequestError>
    where
        I: Iterator<Item = P>,
        P: Into<Option<Property>>,
    {
        let properties = normalize(cursor)?;
        Ok(Self::from_normalized(on, workspace_name.into(), properties))
    }

    // Callers guarantee `properties` is non-empty and already filtered.
    fn from_normalized(on: Location, workspace_name: String, properties: Vec<Property>) -> Self {
        debug_assert!(!properties.is_empty());
        Self {
            on,
            workspace_name,
            properties,
            actual_location: WriteOnce::new("actual location"),
        }
    }

    pub fn builder() -> UpdatePropertiesRequestBuilder {
        UpdatePropertiesRequestBuilder::default()
    }

    pub fn on(&self) -> &Location {
        &self.on
    }

    pub fn in_workspace(&self) -> &str {
        &self.workspace_name
    }

    /// The properties to set, in order; never empty.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    /// The update for `name`, if this request carries one.
    ///
    /// When the name appears more than once the last entry is returned, as
    /// that is the one left in place once the update is applied.
    pub fn property(&self, name: &Name) -> Option<&Property> {
        self.properties.iter().rev().find(|prop| prop.name() == name)
    }

    /// Record the resolved location of the updated node.
    ///
    /// `actual` must denote the same node as [`UpdatePropertiesRequest::on`]
    /// and must carry a path.
    pub fn set_actual_location_of_node(&mut self, actual: Location) -> Result<(), RequestError> {
        let actual = ActualLocation::resolve(&self.on, actual)?;
        self.actual_location.set(actual)
    }

    pub fn actual_location_of_node(&self) -> Option<&Location> {
        self.actual_location.get().map(ActualLocation::location)
    }

    /// Whether `other` updates the same node in the same workspace.
    pub fn targets_same_node(&self, other: &UpdatePropertiesRequest) -> bool {
        self.workspace_name == other.workspace_name
            && (self.on == other.on || self.on.is_same(&other.on))
    }

    /// Combine with a later update of the same node.
    ///
    /// The result applies `self`, then `other` on top: properties only in
    /// `self` keep their order and come first, followed by every property of
    /// `other` in its order. Neither operand changes. With no `other`, the
    /// result equals `self`.
    ///
    /// Fails with [`RequestError::MergeTargetMismatch`] when `other` targets
    /// another node or workspace.
    pub fn merge_with(
        &self,
        other: Option<&UpdatePropertiesRequest>,
    ) -> Result<UpdatePropertiesRequest, RequestError> {
        let Some(other) = other else {
            return Ok(self.clone());
        };
        if !self.targets_same_node(other) {
            return Err(RequestError::MergeTargetMismatch {
                on: self.on.clone(),
                workspace: self.workspace_name.clone(),
                other_on: other.on.clone(),
                other_workspace: other.workspace_name.clone(),
            });
        }

        Ok(self.merged_onto(other))
    }

    /// Merge without checking the target; callers have established
    /// [`UpdatePropertiesRequest::targets_same_node`].
    pub(crate) fn merged_onto(&self, other: &UpdatePropertiesRequest) -> UpdatePropertiesRequest {
        let merged = merge_properties(&self.properties, &other.properties);
        trace!(
            on = %self.on,
            workspace = %self.workspace_name,
            base = self.properties.len(),
            overrides = other.properties.len(),
            merged = merged.len(),
            "merged property updates"
        );
        Self::from_normalized(self.on.clone(), self.workspace_name.clone(), merged)
    }
}

fn normalize<I, P>(properties: I) -> Result<Vec<Property>, RequestError>
where
    I: IntoIterator<Item = P>,
    P: Into<Option<Property>>,
{
    let properties: Vec<Property> = properties
        .into_iter()
        .filter_map(Into::<Option<Property>>::into)
        .collect();
    if properties.is_empty() {
        return Err(RequestError::EmptyProperties);
    }
    Ok(properties)
}

fn merge_properties(base: &[Property], overrides: &[Property]) -> Vec<Property> {
    match overrides {
        [only] => {
            let mut merged: Vec<Property> = base
                .iter()
                .filter(|prop| prop.name() != only.name())
                .cloned()
                .collect();
            merged.push(only.clone());
            merged
        }
        _ => merge_properties_by_name(base, overrides),
    }
}

fn merge_properties_by_name(base: &[Property], overrides: &[Property]) -> Vec<Property> {
    let overridden: BTreeSet<&Name> = overrides.iter().map(Property::name).collect();
    base.iter()
        .filter(|prop| !overridden.contains(prop.name()))
        .chain(overrides)
        .cloned()
        .collect()
}

impl Request for UpdatePropertiesRequest {
    fn is_read_only(&self) -> bool {
        false
    }

    fn on(&self) -> &Location {
        &self.on
    }

    fn in_workspace(&self) -> &str {
        &self.workspace_name
    }

    fn actual_location_of_node(&self) -> Option<&Location> {
        UpdatePropertiesRequest::actual_location_of_node(self)
    }
}

impl<'a> IntoIterator for &'a UpdatePropertiesRequest {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

/// Equality reflects the request, not its outcome; property order matters.
impl PartialEq for UpdatePropertiesRequest {
    fn eq(&self, other: &Self) -> bool {
        self.on == other.on
            && self.properties == other.properties
            && self.workspace_name == other.workspace_name
    }
}

impl fmt::Display for UpdatePropertiesRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "update properties on {} in the \"{}\" workspace to [",
            self.on, self.workspace_name
        )?;
        for (idx, property) in self.properties.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{property}")?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePropertiesRequestBuilder {
    on: Option<Location>,
    workspace_name: Option<String>,
    properties: Vec<Property>,
}

impl UpdatePropertiesRequestBuilder {
    pub fn on(mut self, on: impl Into<Option<Location>>) -> Self {
        self.on = on.into();
        self
    }

    pub fn in_workspace(mut self, workspace_name: Option<impl Into<String>>) -> Self {
        self.workspace_name = workspace_name.map(Into::into);
        self
    }

    /// Append one property; `None` is skipped.
    pub fn property(mut self, property: impl Into<Option<Property>>) -> Self {
        self.properties.extend(property.into());
        self
    }

    pub fn build(self) -> Result<UpdatePropertiesRequest, RequestError> {
        let on = self.on.ok_or_else(|| RequestError::missing("on"))?;
        let workspace_name = self
            .workspace_name
            .ok_or_else(|| RequestError::missing("workspaceName"))?;
        UpdatePropertiesRequest::new(on, workspace_name, self.properties)
    }
}
