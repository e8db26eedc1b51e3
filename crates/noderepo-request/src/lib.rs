//! # noderepo-request
//!
//! Immutable instructions describing units of work against a workspace-scoped
//! graph store.
//!
//! A caller builds a request and hands it to a processor. The processor
//! executes it and records the outcome on the request exactly once: the
//! resolved location of the affected node, and for reads the property that
//! was found. Everything that identifies the request (`on`, workspace,
//! property names) is fixed at construction and drives equality.
//!
//! ```text
//! caller ──build──▶ Request ──&mut──▶ processor
//!                      ▲                  │
//!                      └── outcome slots ─┘ (write-once)
//! ```
//!
//! This crate performs no I/O and never blocks.

pub mod batch;
pub mod error;
pub mod read_property;
pub mod request;
pub mod resolved;
pub mod update_properties;

pub use batch::RequestBatch;
pub use error::RequestError;
pub use read_property::{ReadPropertyRequest, ReadPropertyRequestBuilder};
pub use request::{CacheKey, Cacheable, GraphRequest, Request};
pub use resolved::{ActualLocation, WriteOnce};
pub use update_properties::{UpdatePropertiesRequest, UpdatePropertiesRequestBuilder};
