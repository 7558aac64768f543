//! Multi-table subsetting
//!
//! Applies one key set per layer: node ids to `nexus`, `flowpaths` and
//! `flowpath-attributes`, divide ids to `divides` and `network`.

use crate::error::ExtractError;
use crate::keys::SubsetKeys;
use crate::store::TableProvider;
use crate::table::Table;
use crate::types::Layer;
use tracing::{debug, info};

/// The five hydrofabric layers
#[derive(Debug, Clone, PartialEq)]
pub struct HydrofabricTables {
    pub divides: Table,
    pub nexus: Table,
    pub flowpaths: Table,
    pub flowpath_attributes: Table,
    pub network: Table,
}

impl HydrofabricTables {
    /// Load all five layers, failing on the first missing one
    pub fn load<P: TableProvider + ?Sized>(provider: &P) -> Result<Self, ExtractError> {
        let tables = Self {
            flowpaths: provider.get_layer(Layer::Flowpaths.as_str())?,
            nexus: provider.get_layer(Layer::Nexus.as_str())?,
            divides: provider.get_layer(Layer::Divides.as_str())?,
            flowpath_attributes: provider.get_layer(Layer::FlowpathAttributes.as_str())?,
            network: provider.get_layer(Layer::Network.as_str())?,
        };
        info!(
            source = %provider.source_name(),
            divides = tables.divides.len(),
            nexus = tables.nexus.len(),
            flowpaths = tables.flowpaths.len(),
            flowpath_attributes = tables.flowpath_attributes.len(),
            network = tables.network.len(),
            "Loaded hydrofabric layers"
        );
        Ok(tables)
    }

    pub fn get(&self, layer: Layer) -> &Table {
        match layer {
            Layer::Divides => &self.divides,
            Layer::Nexus => &self.nexus,
            Layer::Flowpaths => &self.flowpaths,
            Layer::FlowpathAttributes => &self.flowpath_attributes,
            Layer::Network => &self.network,
        }
    }

    /// Layers paired with their names, in export order
    pub fn into_layers(self) -> Vec<(Layer, Table)> {
        vec![
            (Layer::Divides, self.divides),
            (Layer::Nexus, self.nexus),
            (Layer::Flowpaths, self.flowpaths),
            (Layer::FlowpathAttributes, self.flowpath_attributes),
            (Layer::Network, self.network),
        ]
    }
}

/// Filter every layer by its key set
///
/// `attribute_columns` projects `flowpath-attributes` before filtering, so it
/// must include `link`. The attribute result is deduplicated on full rows.
pub fn subset_tables<S: AsRef<str>>(
    tables: &HydrofabricTables,
    keys: &SubsetKeys,
    attribute_columns: Option<&[S]>,
) -> Result<HydrofabricTables, ExtractError> {
    let attributes = match attribute_columns {
        Some(columns) => tables.flowpath_attributes.project(columns)?,
        None => tables.flowpath_attributes.clone(),
    };

    let filter = |table: &Table, layer: Layer| -> Result<Table, ExtractError> {
        let keys = match layer {
            Layer::Divides | Layer::Network => &keys.divide_ids,
            Layer::Nexus | Layer::Flowpaths => &keys.node_ids,
            Layer::FlowpathAttributes => keys.attribute_links(),
        };
        let subset = table.filter_by_key(layer.key_column(), keys)?;
        debug!(layer = %layer, kept = subset.len(), total = table.len(), "Filtered layer");
        Ok(subset)
    };

    let subset = HydrofabricTables {
        divides: filter(&tables.divides, Layer::Divides)?,
        nexus: filter(&tables.nexus, Layer::Nexus)?,
        flowpaths: filter(&tables.flowpaths, Layer::Flowpaths)?,
        flowpath_attributes: filter(&attributes, Layer::FlowpathAttributes)?.dedup(),
        network: filter(&tables.network, Layer::Network)?,
    };
    info!(
        divides = subset.divides.len(),
        nexus = subset.nexus.len(),
        flowpaths = subset.flowpaths.len(),
        flowpath_attributes = subset.flowpath_attributes.len(),
        network = subset.network.len(),
        "Subset hydrofabric layers"
    );
    Ok(subset)
}
