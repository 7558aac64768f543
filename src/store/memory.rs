//! In-memory container

use super::{TableExporter, TableProvider};
use crate::error::ExtractError;
use crate::table::Table;
use std::collections::BTreeMap;

/// Layers held in a map keyed by layer name
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    layers: BTreeMap<String, Table>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a layer under its table name
    pub fn insert(&mut self, table: Table) {
        self.layers.insert(table.name().to_string(), table);
    }

    pub fn layer(&self, layer: &str) -> Option<&Table> {
        self.layers.get(layer)
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.keys().map(String::as_str).collect()
    }
}

impl TableProvider for MemoryContainer {
    fn source_name(&self) -> String {
        "memory".to_string()
    }

    fn get_layer(&self, layer: &str) -> Result<Table, ExtractError> {
        self.layers
            .get(layer)
            .cloned()
            .ok_or_else(|| ExtractError::LayerNotFound {
                layer: layer.to_string(),
                source_name: self.source_name(),
            })
    }
}

impl TableExporter for MemoryContainer {
    fn write_layer(&mut self, layer: &str, table: &Table) -> Result<(), ExtractError> {
        let merged = match self.layers.get(layer) {
            Some(existing) => {
                if existing.schema() != table.schema() {
                    return Err(ExtractError::SchemaMismatch {
                        layer: layer.to_string(),
                    });
                }
                let mut merged = existing.clone();
                for row in table.rows() {
                    merged.push_row(row.clone())?;
                }
                merged
            }
            None => Table::with_rows(layer, table.schema().clone(), table.rows().to_vec())?,
        };
        self.layers.insert(layer.to_string(), merged);
        Ok(())
    }
}
