//! Outcome slots written by the executing processor.

use crate::error::RequestError;
use noderepo_graph::Location;

/// A result slot that accepts exactly one write.
///
/// Requests are otherwise immutable; the processor that executes a request
/// fills its slots once, after which the request is only read. A second
/// write is a processor bug and fails with [`RequestError::AlreadyResolved`].
#[derive(Debug, Clone)]
pub struct WriteOnce<T> {
    slot: &'static str,
    value: Option<T>,
}

impl<T> WriteOnce<T> {
    /// An unset slot; `slot` names it in error messages.
    pub const fn new(slot: &'static str) -> Self {
        Self { slot, value: None }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn set(&mut self, value: T) -> Result<(), RequestError> {
        if self.value.is_some() {
            return Err(RequestError::AlreadyResolved { slot: self.slot });
        }
        self.value = Some(value);
        Ok(())
    }
}

/// A location proven to denote the requested node and to carry a path.
///
/// It may differ from the requested location only by being more fully
/// resolved, e.g. the request named the node by identifier and this also
/// carries the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualLocation(Location);

impl ActualLocation {
    pub fn resolve(on: &Location, actual: Location) -> Result<Self, RequestError> {
        if !on.is_same(&actual) {
            return Err(RequestError::ActualLocationNotSame {
                actual,
                on: on.clone(),
            });
        }
        if !actual.has_path() {
            return Err(RequestError::ActualLocationWithoutPath { actual });
        }
        Ok(Self(actual))
    }

    pub fn location(&self) -> &Location {
        &self.0
    }

    pub fn into_location(self) -> Location {
        self.0
    }
}

impl AsRef<Location> for ActualLocation {
    fn as_ref(&self) -> &Location {
        &self.0
    }
}
