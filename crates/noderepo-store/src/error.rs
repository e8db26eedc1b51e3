//! Errors raised while configuring the store or executing requests.

use noderepo_graph::{GraphError, Location, Path};
use noderepo_request::RequestError;

/// Failures while executing a request.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The request named a workspace this store does not have.
    #[error("workspace \"{0}\" does not exist")]
    InvalidWorkspace(String),

    #[error("workspace \"{0}\" already exists")]
    WorkspaceExists(String),

    #[error("no node at {location} in the \"{workspace}\" workspace")]
    NodeNotFound { location: Location, workspace: String },

    #[error("a node already exists at {path} in the \"{workspace}\" workspace")]
    NodeExists { path: Path, workspace: String },

    /// The processor tried to record an outcome the request rejected.
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Failures while loading a [`crate::StoreConfig`] or seeding a repository.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Seed(#[from] ProcessError),
}
