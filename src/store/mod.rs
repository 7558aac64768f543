//! Table Containers
//!
//! A container holds named layers. `TableProvider` reads them, `TableExporter`
//! writes them. The pipeline only talks to these traits; `SledContainer` and
//! `MemoryContainer` are the backends shipped with the crate.

pub mod memory;
pub mod persistence;

use crate::error::ExtractError;
use crate::table::Table;
use crate::types::Layer;
use tracing::debug;

pub use memory::MemoryContainer;
pub use persistence::SledContainer;

/// Read side of a container
pub trait TableProvider {
    /// Human-readable name of the container, used in error messages
    fn source_name(&self) -> String;

    /// Load `layer`, failing with `LayerNotFound` if the container lacks it
    fn get_layer(&self, layer: &str) -> Result<Table, ExtractError>;
}

/// Write side of a container
pub trait TableExporter {
    /// Write `table` as layer `layer`, appending when the layer already exists
    ///
    /// A failed write must leave previously written layers intact.
    fn write_layer(&mut self, layer: &str, table: &Table) -> Result<(), ExtractError>;

    /// Write every layer in the given order, one at a time
    ///
    /// Stops at the first failure and reports it as `ExportWrite` naming the
    /// layer that was being written.
    fn export(&mut self, layers: &[(Layer, Table)]) -> Result<(), ExtractError> {
        for (layer, table) in layers {
            debug!(layer = %layer, rows = table.len(), "Writing layer");
            self.write_layer(layer.as_str(), table).map_err(|e| match e {
                ExtractError::ExportWrite { .. } => e,
                other => ExtractError::ExportWrite {
                    layer: layer.to_string(),
                    reason: other.to_string(),
                },
            })?;
        }
        Ok(())
    }
}
