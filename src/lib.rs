//! Hfsubset: Upstream Hydrofabric Extraction
//!
//! Builds the river network described by a hydrofabric's `nexus` and
//! `flowpaths` layers, resolves everything upstream of a seed node, and writes
//! the matching rows of the five hydrofabric layers to a new container.

pub mod config;
pub mod error;
pub mod extract;
pub mod keys;
pub mod logging;
pub mod network;
pub mod store;
pub mod subset;
pub mod table;
pub mod types;

pub use error::{ExtractError, StorageError};
pub use extract::{
    extract_upstream, extract_upstream_with, ExtractOptions, ExtractResult, Extractor,
    LayerSummary, UpstreamExtract,
};
pub use keys::{divide_id_for, SubsetKeys};
pub use network::{resolve_upstream, HydroNetwork};
pub use store::{MemoryContainer, SledContainer, TableExporter, TableProvider};
pub use subset::{subset_tables, HydrofabricTables};
pub use table::{Column, DataType, Row, Schema, Table, Value};
pub use types::{DivideId, Layer, NodeId};
