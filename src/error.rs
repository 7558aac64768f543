//! Error types
//!
//! `ExtractError` is what every pipeline operation returns to its caller.
//! `StorageError` covers failures inside a table container backend and is
//! folded into `ExtractError` at the trait boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by table container backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Codec(err.to_string())
    }
}

/// Errors surfaced by an extraction run
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Layer {layer} does not exist in {source_name}")]
    LayerNotFound { layer: String, source_name: String },

    #[error("Node not found in network graph: {0}")]
    NodeNotFound(String),

    #[error("Malformed identifier: {0:?} (expected <prefix>-<number>)")]
    MalformedIdentifier(String),

    #[error("Failed to write layer {layer}: {reason}")]
    ExportWrite { layer: String, reason: String },

    #[error("Layer {layer} is missing required column {column}")]
    MissingColumn { layer: String, column: String },

    #[error("Column {column} in layer {layer} must hold {expected} values")]
    ColumnType {
        layer: String,
        column: String,
        expected: String,
    },

    #[error("Invalid row in layer {layer}: {reason}")]
    InvalidRow { layer: String, reason: String },

    #[error("Layer {layer} already exists with a different schema")]
    SchemaMismatch { layer: String },

    #[error("Upstream closure of {seed} exceeds the limit of {limit} nodes")]
    UpstreamLimitExceeded { seed: String, limit: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<config::ConfigError> for ExtractError {
    fn from(err: config::ConfigError) -> Self {
        ExtractError::ConfigError(err.to_string())
    }
}
