//! # noderepo-store
//!
//! A reference processor that executes noderepo requests against an
//! in-memory, workspace-scoped node tree.
//!
//! This crate provides:
//! - `RequestProcessor`, the seam a connector implements
//! - `MemoryRepository`, a deterministic in-memory implementation
//! - `StoreConfig`, TOML configuration for workspaces and seed nodes
//!
//! It does not persist anything and does not cache results.
//!
//! ## Data model
//!
//! ```text
//! StoreConfig (TOML)
//!     │  from_config
//! MemoryRepository ── workspace name ──▶ Workspace
//!                                          ├─ path → Node (uuid, ordered properties)
//!                                          └─ uuid → path
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod processor;

pub use config::{DEFAULT_WORKSPACE, NodeConfig, SeedValue, SeedValues, StoreConfig, WorkspaceConfig};
pub use error::{ConfigError, ProcessError};
pub use memory::{MemoryRepository, Node};
pub use processor::RequestProcessor;
