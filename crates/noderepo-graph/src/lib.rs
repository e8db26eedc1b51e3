//! # noderepo-graph
//!
//! The value model consumed by the noderepo request layer.
//!
//! A graph store is partitioned into named workspaces. Inside a workspace,
//! nodes live at hierarchical paths and may also carry a stable identifier.
//! Nodes hold named, possibly multi-valued properties.
//!
//! ## Architecture
//!
//! ```text
//! Name                  ← namespace-qualified, cheaply cloned
//!     │
//! Path                  ← absolute sequence of (Name, sibling index)
//!     │
//! Location              ← Path and/or Uuid, compared by node identity
//!
//! Value                 ← typed scalar
//!     │
//! Property              ← Name + ordered values
//! ```
//!
//! Everything here is immutable once built and safe to share across threads.

pub mod error;
pub mod location;
pub mod name;
pub mod path;
pub mod property;
pub mod value;

pub use error::GraphError;
pub use location::Location;
pub use name::Name;
pub use path::{Path, Segment};
pub use property::Property;
pub use value::Value;
