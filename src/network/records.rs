//! Typed nexus and flowpath records read out of their layers

use crate::error::ExtractError;
use crate::table::{DataType, Table, Value};
use crate::types::{Layer, NodeId};

/// Network junction or outlet
#[derive(Debug, Clone, PartialEq)]
pub struct NexusNode {
    pub id: NodeId,
    pub nexus_type: Option<String>,
    pub toid: Option<NodeId>,
    /// Opaque spatial payload, passed through untouched
    pub geometry: Value,
}

/// Directed flow segment from `id` to `toid`
#[derive(Debug, Clone, PartialEq)]
pub struct FlowpathEdge {
    pub id: NodeId,
    pub toid: Option<NodeId>,
    pub mainstem: Option<i64>,
    pub order: Option<i64>,
    pub hydroseq: Option<i64>,
    pub lengthkm: Option<f64>,
    pub areasqkm: Option<f64>,
    pub tot_drainage_areasqkm: Option<f64>,
    pub has_divide: Option<bool>,
    pub divide_id: Option<String>,
    pub geometry: Value,
}

/// Column accessor over one layer; required key columns must be text
struct RowReader<'t> {
    table: &'t Table,
}

impl<'t> RowReader<'t> {
    fn new(table: &'t Table) -> Self {
        Self { table }
    }

    fn text(&self, column: &str) -> Result<usize, ExtractError> {
        self.table.require_typed_column(column, DataType::Text)
    }

    fn optional(&self, column: &str) -> Option<usize> {
        self.table.schema().column_index(column)
    }

    fn geometry(&self) -> Option<usize> {
        self.table
            .geometry_column()
            .and_then(|g| self.table.schema().column_index(g))
    }
}

fn cell<'r>(row: &'r [Value], idx: Option<usize>) -> &'r Value {
    const NULL: &Value = &Value::Null;
    idx.map(|i| &row[i]).unwrap_or(NULL)
}

fn cell_text(row: &[Value], idx: Option<usize>) -> Option<String> {
    cell(row, idx).as_str().map(str::to_string)
}

fn cell_int(row: &[Value], idx: Option<usize>) -> Option<i64> {
    let value = cell(row, idx);
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

fn cell_bool(row: &[Value], idx: Option<usize>) -> Option<bool> {
    let value = cell(row, idx);
    value.as_bool().or_else(|| value.as_i64().map(|i| i != 0))
}

fn required_id(row: &[Value], idx: usize, layer: Layer) -> Result<NodeId, ExtractError> {
    row[idx]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ExtractError::InvalidRow {
            layer: layer.to_string(),
            reason: "null identifier".to_string(),
        })
}

impl NexusNode {
    /// Read every row of the `nexus` layer
    ///
    /// `id` and `toid` are required text columns; `type` is optional.
    pub fn from_table(table: &Table) -> Result<Vec<NexusNode>, ExtractError> {
        let reader = RowReader::new(table);
        let id = reader.text("id")?;
        let toid = Some(reader.text("toid")?);
        let nexus_type = reader.optional("type");
        let geometry = reader.geometry();

        table
            .rows()
            .iter()
            .map(|row| {
                Ok(NexusNode {
                    id: required_id(row, id, Layer::Nexus)?,
                    nexus_type: cell_text(row, nexus_type),
                    toid: cell_text(row, toid),
                    geometry: cell(row, geometry).clone(),
                })
            })
            .collect()
    }
}

impl FlowpathEdge {
    /// Read every row of the `flowpaths` layer
    ///
    /// `id` and `toid` are required text columns; the hydrologic attributes
    /// are read when present.
    pub fn from_table(table: &Table) -> Result<Vec<FlowpathEdge>, ExtractError> {
        let reader = RowReader::new(table);
        let id = reader.text("id")?;
        let toid = Some(reader.text("toid")?);
        let mainstem = reader.optional("mainstem");
        let order = reader.optional("order");
        let hydroseq = reader.optional("hydroseq");
        let lengthkm = reader.optional("lengthkm");
        let areasqkm = reader.optional("areasqkm");
        let tot_drainage_areasqkm = reader.optional("tot_drainage_areasqkm");
        let has_divide = reader.optional("has_divide");
        let divide_id = reader.optional("divide_id");
        let geometry = reader.geometry();

        table
            .rows()
            .iter()
            .map(|row| {
                Ok(FlowpathEdge {
                    id: required_id(row, id, Layer::Flowpaths)?,
                    toid: cell_text(row, toid),
                    mainstem: cell_int(row, mainstem),
                    order: cell_int(row, order),
                    hydroseq: cell_int(row, hydroseq),
                    lengthkm: cell(row, lengthkm).as_f64(),
                    areasqkm: cell(row, areasqkm).as_f64(),
                    tot_drainage_areasqkm: cell(row, tot_drainage_areasqkm).as_f64(),
                    has_divide: cell_bool(row, has_divide),
                    divide_id: cell_text(row, divide_id),
                    geometry: cell(row, geometry).clone(),
                })
            })
            .collect()
    }
}
