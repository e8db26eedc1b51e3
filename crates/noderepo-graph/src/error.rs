//! Error types for graph value construction.

/// Errors raised while building names, paths, or locations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A name was empty or contained reserved characters.
    #[error("invalid name {input:?}: {reason}")]
    InvalidName { input: String, reason: String },

    /// A path was relative, had an empty segment, or a bad sibling index.
    #[error("invalid path {input:?}: {reason}")]
    InvalidPath { input: String, reason: String },

    /// A location must be addressable somehow.
    #[error("a location requires a path, an identifier, or both")]
    MissingIdentity,
}

impl GraphError {
    pub(crate) fn invalid_name(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_path(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
