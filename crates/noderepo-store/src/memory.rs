//! Canonical in-memory node trees, one per workspace.
//!
//! This is the reference processor:
//! - resolve a location by identifier first, then by path
//! - record the fully resolved location on every request it executes
//! - apply updates in order, with valueless properties removing

use crate::config::StoreConfig;
use crate::error::{ConfigError, ProcessError};
use crate::processor::RequestProcessor;
use noderepo_graph::{Location, Name, Path, Property};
use noderepo_request::{ReadPropertyRequest, UpdatePropertiesRequest};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A stored node: identity plus properties in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    uuid: Uuid,
    path: Path,
    properties: Vec<Property>,
}

impl Node {
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The fully resolved location of this node.
    pub fn location(&self) -> Location {
        Location::resolved(self.path.clone(), self.uuid)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &Name) -> Option<&Property> {
        self.properties.iter().find(|prop| prop.name() == name)
    }

    /// Set `property`, replacing in place; a valueless property removes.
    fn apply(&mut self, property: Property) {
        let existing = self
            .properties
            .iter()
            .position(|prop| prop.name() == property.name());
        match (existing, property.is_empty()) {
            (Some(idx), true) => {
                self.properties.remove(idx);
            }
            (Some(idx), false) => self.properties[idx] = property,
            (None, true) => {}
            (None, false) => self.properties.push(property),
        }
    }
}

#[derive(Debug, Clone)]
struct Workspace {
    nodes: BTreeMap<Path, Node>,
    by_uuid: BTreeMap<Uuid, Path>,
}

impl Workspace {
    fn new() -> Self {
        let root = Node {
            uuid: Uuid::new_v4(),
            path: Path::root(),
            properties: Vec::new(),
        };
        let mut by_uuid = BTreeMap::new();
        by_uuid.insert(root.uuid, root.path.clone());
        let mut nodes = BTreeMap::new();
        nodes.insert(root.path.clone(), root);
        Self { nodes, by_uuid }
    }

    /// Identifier wins; a location whose path disagrees with the node found
    /// by identifier does not resolve.
    fn resolve_path(&self, location: &Location) -> Option<&Path> {
        match location.uuid() {
            Some(uuid) => {
                let path = self.by_uuid.get(&uuid)?;
                match location.path() {
                    Some(requested) if requested != path => None,
                    _ => Some(path),
                }
            }
            None => location
                .path()
                .and_then(|path| self.nodes.get_key_value(path))
                .map(|(key, _)| key),
        }
    }

    fn resolve(&self, location: &Location) -> Option<&Node> {
        let path = self.resolve_path(location)?;
        self.nodes.get(path)
    }

    fn resolve_mut(&mut self, location: &Location) -> Option<&mut Node> {
        let path = self.resolve_path(location)?.clone();
        self.nodes.get_mut(&path)
    }
}

/// Deterministic in-memory store keyed by workspace name.
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    workspaces: BTreeMap<String, Workspace>,
    default_workspace: String,
}

impl MemoryRepository {
    /// A repository holding one empty workspace (just its root node).
    pub fn new(default_workspace: impl Into<String>) -> Self {
        let default_workspace = default_workspace.into();
        let mut workspaces = BTreeMap::new();
        workspaces.insert(default_workspace.clone(), Workspace::new());
        Self {
            workspaces,
            default_workspace,
        }
    }

    /// Build and seed a repository from configuration.
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut repo = Self::new(config.default_workspace.clone());
        for workspace in &config.workspaces {
            if !repo.has_workspace(&workspace.name) {
                repo.create_workspace(&workspace.name)?;
            }
            for node in &workspace.nodes {
                let properties = node.properties()?;
                repo.insert_node(&workspace.name, node.path.clone(), node.uuid, properties)?;
            }
        }
        info!(
            workspaces = repo.workspaces.len(),
            default_workspace = %repo.default_workspace,
            "memory repository configured"
        );
        Ok(repo)
    }

    pub fn default_workspace(&self) -> &str {
        &self.default_workspace
    }

    /// Workspace names in sorted order.
    pub fn workspace_names(&self) -> impl Iterator<Item = &str> {
        self.workspaces.keys().map(String::as_str)
    }

    pub fn has_workspace(&self, name: &str) -> bool {
        self.workspaces.contains_key(name)
    }

    pub fn create_workspace(&mut self, name: &str) -> Result<(), ProcessError> {
        if self.has_workspace(name) {
            return Err(ProcessError::WorkspaceExists(name.to_string()));
        }
        self.workspaces.insert(name.to_string(), Workspace::new());
        debug!(workspace = name, "created workspace");
        Ok(())
    }

    /// Create a node under an existing parent.
    ///
    /// A fresh identifier is minted when `uuid` is `None`. Returns the
    /// resolved location of the new node.
    pub fn insert_node(
        &mut self,
        workspace: &str,
        path: Path,
        uuid: Option<Uuid>,
        properties: Vec<Property>,
    ) -> Result<Location, ProcessError> {
        let ws = self.workspace_mut(workspace)?;
        if ws.nodes.contains_key(&path) {
            return Err(ProcessError::NodeExists {
                path,
                workspace: workspace.to_string(),
            });
        }
        if let Some(parent) = path.parent()
            && !ws.nodes.contains_key(&parent)
        {
            return Err(ProcessError::NodeNotFound {
                location: Location::at_path(parent),
                workspace: workspace.to_string(),
            });
        }
        let uuid = uuid.unwrap_or_else(Uuid::new_v4);
        if let Some(existing) = ws.by_uuid.get(&uuid) {
            return Err(ProcessError::NodeExists {
                path: existing.clone(),
                workspace: workspace.to_string(),
            });
        }

        let mut node = Node {
            uuid,
            path: path.clone(),
            properties: Vec::new(),
        };
        for property in properties {
            node.apply(property);
        }
        let location = node.location();
        ws.by_uuid.insert(uuid, path.clone());
        ws.nodes.insert(path, node);
        debug!(workspace, %location, "inserted node");
        Ok(location)
    }

    /// Look up the node a location denotes.
    pub fn node(&self, workspace: &str, location: &Location) -> Result<&Node, ProcessError> {
        self.workspace(workspace)?
            .resolve(location)
            .ok_or_else(|| ProcessError::NodeNotFound {
                location: location.clone(),
                workspace: workspace.to_string(),
            })
    }

    /// Number of nodes in a workspace, root included.
    pub fn node_count(&self, workspace: &str) -> Result<usize, ProcessError> {
        Ok(self.workspace(workspace)?.nodes.len())
    }

    fn workspace(&self, name: &str) -> Result<&Workspace, ProcessError> {
        self.workspaces.get(name).ok_or_else(|| {
            warn!(workspace = name, "request names an unknown workspace");
            ProcessError::InvalidWorkspace(name.to_string())
        })
    }

    fn workspace_mut(&mut self, name: &str) -> Result<&mut Workspace, ProcessError> {
        self.workspaces.get_mut(name).ok_or_else(|| {
            warn!(workspace = name, "request names an unknown workspace");
            ProcessError::InvalidWorkspace(name.to_string())
        })
    }
}

impl RequestProcessor for MemoryRepository {
    #[instrument(level = "debug", skip_all, fields(request = %request))]
    fn process_read_property(
        &mut self,
        request: &mut ReadPropertyRequest,
    ) -> Result<(), ProcessError> {
        let node = self.node(request.in_workspace(), request.on())?;
        let property = node.property(request.named()).cloned();
        let found = property.is_some();
        request.set_property(property)?;
        request.set_actual_location_of_node(node.location())?;
        debug!(found, "read property");
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(request = %request))]
    fn process_update_properties(
        &mut self,
        request: &mut UpdatePropertiesRequest,
    ) -> Result<(), ProcessError> {
        let workspace = request.in_workspace().to_string();
        let node = self
            .workspace_mut(&workspace)?
            .resolve_mut(request.on())
            .ok_or_else(|| ProcessError::NodeNotFound {
                location: request.on().clone(),
                workspace: workspace.clone(),
            })?;

        // Record the outcome first so a rejected request leaves the node as is.
        request.set_actual_location_of_node(node.location())?;

        let removed = request.iter().filter(|prop| prop.is_empty()).count();
        for property in request.iter() {
            node.apply(property.clone());
        }
        debug!(
            updated = request.properties().len() - removed,
            removed,
            "updated properties"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noderepo_request::{Request, RequestError};

    fn path(raw: &str) -> Path {
        Path::parse(raw).expect("valid path")
    }

    fn name(raw: &str) -> Name {
        Name::local(raw).expect("valid name")
    }

    fn repo_with_node() -> (MemoryRepository, Uuid) {
        let mut repo = MemoryRepository::new("default");
        let id = Uuid::new_v4();
        repo.insert_node("default", path("/a"), None, Vec::new())
            .expect("parent inserts");
        repo.insert_node(
            "default",
            path("/a/b"),
            Some(id),
            vec![Property::single(name("title"), "Hello")],
        )
        .expect("child inserts");
        (repo, id)
    }

    #[test]
    fn read_by_identifier_records_resolved_location() {
        let (mut repo, id) = repo_with_node();
        let mut req = ReadPropertyRequest::new(Location::with_uuid(id), "default", name("title"));
        repo.process_read_property(&mut req).expect("read succeeds");

        assert_eq!(
            req.property(),
            Some(&Property::single(name("title"), "Hello"))
        );
        assert_eq!(
            req.actual_location_of_node(),
            Some(&Location::resolved(path("/a/b"), id))
        );
    }

    #[test]
    fn read_missing_property_records_absence() {
        let (mut repo, _) = repo_with_node();
        let mut req =
            ReadPropertyRequest::new(Location::at_path(path("/a/b")), "default", name("body"));
        repo.process_read_property(&mut req).expect("read succeeds");
        assert!(req.was_read());
        assert!(req.property().is_none());
        assert!(req.actual_location_of_node().is_some());
    }

    #[test]
    fn unknown_workspace_is_rejected() {
        let (mut repo, _) = repo_with_node();
        let mut req =
            ReadPropertyRequest::new(Location::at_path(path("/a/b")), "nope", name("title"));
        let err = repo
            .process_read_property(&mut req)
            .expect_err("unknown workspace must fail");
        assert!(matches!(err, ProcessError::InvalidWorkspace(ws) if ws == "nope"));
    }

    #[test]
    fn disagreeing_location_is_not_found() {
        let (repo, id) = repo_with_node();
        let err = repo
            .node("default", &Location::resolved(path("/a"), id))
            .expect_err("path and identifier disagree");
        assert!(matches!(err, ProcessError::NodeNotFound { .. }));
    }

    #[test]
    fn update_sets_replaces_and_removes_in_order() {
        let (mut repo, id) = repo_with_node();
        let mut req = UpdatePropertiesRequest::new(
            Location::at_path(path("/a/b")),
            "default",
            vec![
                Property::single(name("body"), "text"),
                Property::single(name("title"), "Renamed"),
                Property::empty(name("missing")),
            ],
        )
        .expect("valid update");
        repo.process_update_properties(&mut req)
            .expect("update succeeds");

        let node = repo
            .node("default", &Location::with_uuid(id))
            .expect("node exists");
        let rendered: Vec<String> = node.properties().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec![r#"title=["Renamed"]"#, r#"body=["text"]"#]);
        assert_eq!(req.actual_location_of_node(), Some(&node.location()));

        let mut removal = UpdatePropertiesRequest::new(
            Location::with_uuid(id),
            "default",
            [Property::empty(name("title"))],
        )
        .expect("valid update");
        repo.process_update_properties(&mut removal)
            .expect("removal succeeds");
        let node = repo
            .node("default", &Location::with_uuid(id))
            .expect("node exists");
        assert!(node.property(&name("title")).is_none());
        assert!(!removal.is_read_only());
    }

    #[test]
    fn reprocessing_a_request_fails_without_touching_the_node() {
        let (mut repo, id) = repo_with_node();
        let mut req = UpdatePropertiesRequest::new(
            Location::with_uuid(id),
            "default",
            [Property::single(name("title"), "First")],
        )
        .expect("valid update");
        repo.process_update_properties(&mut req)
            .expect("first run succeeds");

        let mut fresh = UpdatePropertiesRequest::new(
            Location::with_uuid(id),
            "default",
            [Property::single(name("title"), "Second")],
        )
        .expect("valid update");
        repo.process_update_properties(&mut fresh)
            .expect("fresh request succeeds");

        let err = repo
            .process_update_properties(&mut req)
            .expect_err("outcome already recorded");
        assert!(matches!(
            err,
            ProcessError::Request(RequestError::AlreadyResolved { .. })
        ));
        let node = repo
            .node("default", &Location::with_uuid(id))
            .expect("node exists");
        assert_eq!(
            node.property(&name("title")),
            Some(&Property::single(name("title"), "Second"))
        );
    }

    #[test]
    fn insert_node_requires_parent_and_unique_identity() {
        let (mut repo, id) = repo_with_node();
        let err = repo
            .insert_node("default", path("/x/y"), None, Vec::new())
            .expect_err("missing parent");
        assert!(matches!(err, ProcessError::NodeNotFound { .. }));

        let err = repo
            .insert_node("default", path("/a/c"), Some(id), Vec::new())
            .expect_err("duplicate identifier");
        assert!(matches!(err, ProcessError::NodeExists { .. }));

        let err = repo
            .insert_node("default", path("/"), None, Vec::new())
            .expect_err("root always exists");
        assert!(matches!(err, ProcessError::NodeExists { .. }));
        assert_eq!(repo.node_count("default").expect("workspace exists"), 3);
    }

    #[test]
    fn workspaces_are_isolated() {
        let (mut repo, id) = repo_with_node();
        repo.create_workspace("staging").expect("new workspace");
        assert!(matches!(
            repo.create_workspace("staging"),
            Err(ProcessError::WorkspaceExists(_))
        ));
        assert!(repo.node("staging", &Location::with_uuid(id)).is_err());
        assert_eq!(
            repo.workspace_names().collect::<Vec<_>>(),
            vec!["default", "staging"]
        );
    }
}
