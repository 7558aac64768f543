//! Configuration
//!
//! `HfsubsetConfig` is assembled by the `config` crate from, lowest to highest
//! precedence: serde defaults, the global `hfsubset.toml`, a working-directory
//! `hfsubset.toml`, and `HFSUBSET__*` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Name of the config file looked up in each config location
pub const CONFIG_FILE_NAME: &str = "hfsubset.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HfsubsetConfig {
    #[serde(default)]
    pub extract: ExtractSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied to every extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractSettings {
    /// Columns kept from `flowpath-attributes`; all columns when unset
    #[serde(default)]
    pub attribute_columns: Option<Vec<String>>,

    /// Upper bound on the upstream closure size; unbounded when unset
    #[serde(default)]
    pub max_upstream_nodes: Option<usize>,
}

impl ExtractSettings {
    /// Validate extraction settings.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(columns) = &self.attribute_columns {
            if !columns.iter().any(|c| c == "link") {
                return Err("attribute_columns must include the link column".to_string());
            }
            if let Some(empty) = columns.iter().find(|c| c.trim().is_empty()) {
                return Err(format!("attribute_columns contains an empty name: {:?}", empty));
            }
        }
        if self.max_upstream_nodes == Some(0) {
            return Err("max_upstream_nodes must be greater than zero".to_string());
        }
        Ok(())
    }
}
