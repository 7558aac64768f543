//! Upstream Extraction
//!
//! Load the five layers, build the network, resolve everything upstream of the
//! seed, derive the key sets, subset every layer, and hand the result to an
//! exporter. Each stage runs only if the previous one succeeded, and nothing is
//! written until the subset is complete.

use crate::config::HfsubsetConfig;
use crate::error::ExtractError;
use crate::keys::SubsetKeys;
use crate::network::{resolve_upstream_bounded, HydroNetwork};
use crate::store::{SledContainer, TableExporter, TableProvider};
use crate::subset::{subset_tables, HydrofabricTables};
use crate::types::{DivideId, Layer, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Per-run options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Columns kept from `flowpath-attributes`; all columns when `None`
    pub attribute_columns: Option<Vec<String>>,
    /// Fail if the upstream closure holds more than this many nodes
    pub max_upstream_nodes: Option<usize>,
}

impl ExtractOptions {
    pub fn from_config(config: &HfsubsetConfig) -> Self {
        Self {
            attribute_columns: config.extract.attribute_columns.clone(),
            max_upstream_nodes: config.extract.max_upstream_nodes,
        }
    }

    pub fn with_attribute_columns(mut self, columns: Vec<String>) -> Self {
        self.attribute_columns = Some(columns);
        self
    }

    pub fn with_max_upstream_nodes(mut self, limit: usize) -> Self {
        self.max_upstream_nodes = Some(limit);
        self
    }
}

/// Shape of one exported layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub layer: Layer,
    pub rows: usize,
    pub columns: Vec<String>,
    pub has_geometry: bool,
}

/// Outcome of a successful extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResult {
    pub seed: NodeId,
    /// Upstream closure, seed included
    pub upstream: BTreeSet<NodeId>,
    pub divide_ids: BTreeSet<DivideId>,
    /// Exported layers in write order
    pub layers: Vec<LayerSummary>,
}

impl ExtractResult {
    pub fn layer(&self, layer: Layer) -> Option<&LayerSummary> {
        self.layers.iter().find(|s| s.layer == layer)
    }

    pub fn to_json(&self) -> Result<String, ExtractError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Subset of the hydrofabric upstream of one seed, not yet written anywhere
#[derive(Debug, Clone)]
pub struct UpstreamExtract {
    pub seed: NodeId,
    pub keys: SubsetKeys,
    pub tables: HydrofabricTables,
}

impl UpstreamExtract {
    /// Write the five layers through `exporter` in export order
    pub fn export<E: TableExporter + ?Sized>(
        self,
        exporter: &mut E,
    ) -> Result<ExtractResult, ExtractError> {
        let layers = self.tables.into_layers();
        exporter.export(&layers)?;

        let summaries = layers
            .iter()
            .map(|(layer, table)| LayerSummary {
                layer: *layer,
                rows: table.len(),
                columns: table.column_names().into_iter().map(str::to_string).collect(),
                has_geometry: table.geometry_column().is_some(),
            })
            .collect();

        Ok(ExtractResult {
            seed: self.seed,
            upstream: self.keys.node_ids.into_iter().collect(),
            divide_ids: self.keys.divide_ids.into_iter().collect(),
            layers: summaries,
        })
    }
}

/// Runs extractions against one source container
pub struct Extractor<'p, P: TableProvider + ?Sized> {
    provider: &'p P,
    options: ExtractOptions,
}

impl<'p, P: TableProvider + ?Sized> Extractor<'p, P> {
    pub fn new(provider: &'p P, options: ExtractOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Compute the upstream subset of `seed` without writing it
    pub fn extract(&self, seed: &str) -> Result<UpstreamExtract, ExtractError> {
        let started = Instant::now();
        let tables = HydrofabricTables::load(self.provider)?;

        let network = HydroNetwork::from_tables(&tables.nexus, &tables.flowpaths)?;
        let upstream = resolve_upstream_bounded(&network, seed, self.options.max_upstream_nodes)?;
        let keys = SubsetKeys::derive(upstream, seed)?;
        info!(
            seed,
            nodes = network.node_count(),
            edges = network.edge_count(),
            upstream = keys.node_ids.len(),
            divides = keys.divide_ids.len(),
            "Resolved upstream network"
        );

        let subset = subset_tables(&tables, &keys, self.options.attribute_columns.as_deref())?;
        info!(
            seed,
            duration_ms = started.elapsed().as_millis() as u64,
            "Computed upstream subset"
        );

        Ok(UpstreamExtract {
            seed: seed.to_string(),
            keys,
            tables: subset,
        })
    }

    /// Compute the subset of `seed` and write it through `exporter`
    pub fn run<E: TableExporter + ?Sized>(
        &self,
        seed: &str,
        exporter: &mut E,
    ) -> Result<ExtractResult, ExtractError> {
        self.extract(seed)?.export(exporter)
    }
}

/// Extract everything upstream of `seed` from the container at `source` into
/// the container at `destination`
///
/// The destination is only opened once the subset has been computed, so a
/// failure before export leaves no output behind.
pub fn extract_upstream(
    source: &Path,
    destination: &Path,
    seed: &str,
    attribute_columns: Option<&[String]>,
) -> Result<ExtractResult, ExtractError> {
    let options = ExtractOptions {
        attribute_columns: attribute_columns.map(<[String]>::to_vec),
        max_upstream_nodes: None,
    };
    extract_upstream_with(source, destination, seed, options)
}

/// As `extract_upstream`, with explicit options
pub fn extract_upstream_with(
    source: &Path,
    destination: &Path,
    seed: &str,
    options: ExtractOptions,
) -> Result<ExtractResult, ExtractError> {
    info!(
        source = %source.display(),
        destination = %destination.display(),
        seed,
        "Starting upstream extraction"
    );
    let provider = SledContainer::open_source(source)?;
    let subset = Extractor::new(&provider, options).extract(seed)?;
    drop(provider);

    let mut exporter = SledContainer::open_destination(destination)?;
    let result = subset.export(&mut exporter)?;
    info!(
        seed,
        upstream = result.upstream.len(),
        destination = %destination.display(),
        "Finished upstream extraction"
    );
    Ok(result)
}
