//! Typed Record Sets
//!
//! A `Table` is one hydrofabric layer held in memory: a schema of named, typed
//! columns, an optional geometry column, and rows of `Value`s. Every selection
//! here is pure; the source table is never modified.

pub mod value;

pub use value::{DataType, Value};

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One row of cells, positionally aligned with the schema's columns
pub type Row = Vec<Value>;

/// Named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<Column>,
    /// Name of the column holding the spatial payload, `None` for non-spatial layers
    pub geometry_column: Option<String>,
}

impl Schema {
    pub fn new(columns: Vec<Column>, geometry_column: Option<String>) -> Self {
        Self {
            columns,
            geometry_column,
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// In-memory layer
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table
    ///
    /// The geometry column, when given, must name one of the columns.
    pub fn new(name: impl Into<String>, schema: Schema) -> Result<Self, ExtractError> {
        let name = name.into();
        if let Some(geometry) = &schema.geometry_column {
            if schema.column_index(geometry).is_none() {
                return Err(ExtractError::MissingColumn {
                    layer: name,
                    column: geometry.clone(),
                });
            }
        }
        Ok(Self {
            name,
            schema,
            rows: Vec::new(),
        })
    }

    /// Create a table and append `rows`
    pub fn with_rows(
        name: impl Into<String>,
        schema: Schema,
        rows: Vec<Row>,
    ) -> Result<Self, ExtractError> {
        let mut table = Self::new(name, schema)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row, checking arity and per-column type
    pub fn push_row(&mut self, row: Row) -> Result<(), ExtractError> {
        if row.len() != self.schema.columns.len() {
            return Err(ExtractError::InvalidRow {
                layer: self.name.clone(),
                reason: format!(
                    "expected {} values, got {}",
                    self.schema.columns.len(),
                    row.len()
                ),
            });
        }
        for (column, value) in self.schema.columns.iter().zip(&row) {
            if let Some(actual) = value.data_type() {
                if actual != column.data_type {
                    return Err(ExtractError::InvalidRow {
                        layer: self.name.clone(),
                        reason: format!(
                            "column {} expects {:?}, got {:?}",
                            column.name, column.data_type, actual
                        ),
                    });
                }
            }
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[Column] {
        &self.schema.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn geometry_column(&self) -> Option<&str> {
        self.schema.geometry_column.as_deref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of `column`, or `MissingColumn`
    pub fn require_column(&self, column: &str) -> Result<usize, ExtractError> {
        self.schema
            .column_index(column)
            .ok_or_else(|| ExtractError::MissingColumn {
                layer: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Index of `column`, which must exist and carry `data_type`
    pub fn require_typed_column(
        &self,
        column: &str,
        data_type: DataType,
    ) -> Result<usize, ExtractError> {
        let idx = self.require_column(column)?;
        if self.schema.columns[idx].data_type != data_type {
            return Err(ExtractError::ColumnType {
                layer: self.name.clone(),
                column: column.to_string(),
                expected: format!("{:?}", data_type).to_lowercase(),
            });
        }
        Ok(idx)
    }

    /// Same schema, rows where `predicate` holds
    pub fn filter_rows<F>(&self, predicate: F) -> Table
    where
        F: Fn(&Row) -> bool,
    {
        Table {
            name: self.name.clone(),
            schema: self.schema.clone(),
            rows: self.rows.iter().filter(|row| predicate(row)).cloned().collect(),
        }
    }

    /// Rows whose text `column` value is in `keys`
    ///
    /// Null keys never match.
    pub fn filter_by_key(
        &self,
        column: &str,
        keys: &HashSet<String>,
    ) -> Result<Table, ExtractError> {
        let idx = self.require_typed_column(column, DataType::Text)?;
        Ok(self.filter_rows(|row| match row[idx].as_str() {
            Some(key) => keys.contains(key),
            None => false,
        }))
    }

    /// Restrict the table to `columns`, in the requested order
    ///
    /// Repeated names are kept once. The geometry column survives only if it
    /// is part of the projection.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table, ExtractError> {
        let mut seen = HashSet::new();
        let mut indices = Vec::with_capacity(columns.len());
        for column in columns {
            let column = column.as_ref();
            if seen.insert(column) {
                indices.push(self.require_column(column)?);
            }
        }

        let projected_columns: Vec<Column> = indices
            .iter()
            .map(|&i| self.schema.columns[i].clone())
            .collect();
        let geometry_column = self
            .schema
            .geometry_column
            .as_ref()
            .filter(|g| seen.contains(g.as_str()))
            .cloned();

        Ok(Table {
            name: self.name.clone(),
            schema: Schema::new(projected_columns, geometry_column),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Drop rows equal to an earlier row, keeping first occurrences in order
    pub fn dedup(&self) -> Table {
        let mut seen: HashSet<&Row> = HashSet::with_capacity(self.rows.len());
        let rows = self
            .rows
            .iter()
            .filter(|row| seen.insert(*row))
            .cloned()
            .collect();
        Table {
            name: self.name.clone(),
            schema: self.schema.clone(),
            rows,
        }
    }
}
