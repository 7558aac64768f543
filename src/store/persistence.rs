//! Sled-backed container
//!
//! A container is a sled database directory. Each layer's rows live in tree
//! `layer/<name>`, keyed by big-endian row number and bincode-encoded. The
//! `__meta` tree holds `schema/<name>` (bincode `Schema`) and `rows/<name>`
//! (big-endian row count). A layer write runs in one transaction over both
//! trees, so a failed write leaves earlier layers and the layer itself as they
//! were.

use super::{TableExporter, TableProvider};
use crate::error::{ExtractError, StorageError};
use crate::table::{Row, Schema, Table};
use sled::transaction::{ConflictableTransactionError, TransactionError, Transactional};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const META_TREE: &str = "__meta";

fn rows_tree_name(layer: &str) -> String {
    format!("layer/{}", layer)
}

fn schema_key(layer: &str) -> String {
    format!("schema/{}", layer)
}

fn count_key(layer: &str) -> String {
    format!("rows/{}", layer)
}

fn decode_count(bytes: &[u8]) -> Result<u64, StorageError> {
    let array: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StorageError::Codec(format!("Invalid row count of {} bytes", bytes.len())))?;
    Ok(u64::from_be_bytes(array))
}

/// Hydrofabric container stored in a sled database
pub struct SledContainer {
    db: sled::Db,
    path: PathBuf,
}

impl SledContainer {
    /// Open an existing container for reading
    pub fn open_source(path: &Path) -> Result<Self, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::open(path)
    }

    /// Open a container for writing, creating it if needed
    pub fn open_destination(path: &Path) -> Result<Self, ExtractError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(StorageError::from)?;
            }
        }
        Self::open(path)
    }

    fn open(path: &Path) -> Result<Self, ExtractError> {
        let db = sled::open(path).map_err(StorageError::from)?;
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the stored layers, sorted
    pub fn list_layers(&self) -> Result<Vec<String>, StorageError> {
        let meta = self.db.open_tree(META_TREE)?;
        let mut layers = Vec::new();
        for entry in meta.scan_prefix(b"schema/") {
            let (key, _) = entry?;
            let key = std::str::from_utf8(&key)
                .map_err(|e| StorageError::Codec(format!("Invalid layer key: {}", e)))?;
            if let Some(name) = key.strip_prefix("schema/") {
                layers.push(name.to_string());
            }
        }
        Ok(layers)
    }

    fn read_schema(&self, layer: &str) -> Result<Option<Schema>, StorageError> {
        let meta = self.db.open_tree(META_TREE)?;
        match meta.get(schema_key(layer))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }
}

impl TableProvider for SledContainer {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn get_layer(&self, layer: &str) -> Result<Table, ExtractError> {
        let schema = self
            .read_schema(layer)?
            .ok_or_else(|| ExtractError::LayerNotFound {
                layer: layer.to_string(),
                source_name: self.source_name(),
            })?;

        let rows_tree = self
            .db
            .open_tree(rows_tree_name(layer))
            .map_err(StorageError::from)?;
        let mut table = Table::new(layer, schema)?;
        for entry in rows_tree.iter() {
            let (_, bytes) = entry.map_err(StorageError::from)?;
            let row: Row = bincode::deserialize(&bytes).map_err(StorageError::from)?;
            table.push_row(row)?;
        }

        debug!(layer, rows = table.len(), source = %self.path.display(), "Loaded layer");
        Ok(table)
    }
}

impl TableExporter for SledContainer {
    fn write_layer(&mut self, layer: &str, table: &Table) -> Result<(), ExtractError> {
        let meta = self.db.open_tree(META_TREE).map_err(StorageError::from)?;
        let rows_tree = self
            .db
            .open_tree(rows_tree_name(layer))
            .map_err(StorageError::from)?;

        let schema_bytes = bincode::serialize(table.schema()).map_err(StorageError::from)?;
        let encoded_rows = table
            .rows()
            .iter()
            .map(|row| bincode::serialize(row))
            .collect::<Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;
        let schema_key = schema_key(layer);
        let count_key = count_key(layer);

        let result = (&meta, &rows_tree).transaction(|(meta_tx, rows_tx)| {
            match meta_tx.get(schema_key.as_bytes())? {
                Some(existing) if existing.as_ref() != schema_bytes.as_slice() => {
                    return Err(ConflictableTransactionError::Abort(
                        ExtractError::SchemaMismatch {
                            layer: layer.to_string(),
                        },
                    ));
                }
                Some(_) => {}
                None => {
                    meta_tx.insert(schema_key.as_bytes(), schema_bytes.as_slice())?;
                }
            }

            let start = match meta_tx.get(count_key.as_bytes())? {
                Some(bytes) => decode_count(&bytes).map_err(|e| {
                    ConflictableTransactionError::Abort(ExtractError::Storage(e))
                })?,
                None => 0,
            };
            for (offset, row) in encoded_rows.iter().enumerate() {
                let key = (start + offset as u64).to_be_bytes();
                rows_tx.insert(&key[..], row.as_slice())?;
            }
            let end = start + encoded_rows.len() as u64;
            meta_tx.insert(count_key.as_bytes(), &end.to_be_bytes()[..])?;
            Ok(start)
        });

        let start = match result {
            Ok(start) => start,
            Err(TransactionError::Abort(e)) => return Err(e),
            Err(TransactionError::Storage(e)) => return Err(StorageError::from(e).into()),
        };
        self.db.flush().map_err(StorageError::from)?;

        info!(
            layer,
            appended = table.len(),
            first_row = start,
            destination = %self.path.display(),
            "Wrote layer"
        );
        Ok(())
    }
}
