//! Invalid-argument errors raised by request construction and completion.

use noderepo_graph::{Location, Name};

/// Every variant is a caller or processor bug, raised synchronously at the
/// point of violation. Nothing here is transient, so nothing is retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("required argument `{name}` was not supplied")]
    MissingArgument { name: &'static str },

    #[error("an update must carry at least one property")]
    EmptyProperties,

    #[error("property's name {actual} does not match the requested property name {expected}")]
    PropertyNameMismatch { expected: Name, actual: Name },

    #[error("actual location {actual} is not the same node as the requested location {on}")]
    ActualLocationNotSame { actual: Location, on: Location },

    #[error("actual location {actual} must have a path")]
    ActualLocationWithoutPath { actual: Location },

    #[error("{slot} has already been recorded for this request")]
    AlreadyResolved { slot: &'static str },

    #[error(
        "cannot merge updates on {other_on} in the \"{other_workspace}\" workspace \
         into updates on {on} in the \"{workspace}\" workspace"
    )]
    MergeTargetMismatch {
        on: Location,
        workspace: String,
        other_on: Location,
        other_workspace: String,
    },
}

impl RequestError {
    pub(crate) fn missing(name: &'static str) -> Self {
        Self::MissingArgument { name }
    }
}
