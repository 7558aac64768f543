//! Hydrofabric Network
//!
//! Directed graph over nexus points and flowpaths, and the upstream closure
//! computed on it.

pub mod graph;
pub mod records;
pub mod upstream;

pub use graph::{HydroNetwork, NetworkEdge, NetworkNode};
pub use records::{FlowpathEdge, NexusNode};
pub use upstream::{resolve_upstream, resolve_upstream_bounded};
