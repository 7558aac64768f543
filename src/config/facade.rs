//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::HfsubsetConfig;
use crate::error::ExtractError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the standard locations and environment.
    pub fn load(working_dir: &Path) -> Result<HfsubsetConfig, ExtractError> {
        let config = MergeService::load(working_dir)?;
        Self::validated(config)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<HfsubsetConfig, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = MergeService::load_from_file(path)?;
        Self::validated(config)
    }

    /// Create default configuration.
    pub fn default() -> HfsubsetConfig {
        HfsubsetConfig::default()
    }

    fn validated(config: HfsubsetConfig) -> Result<HfsubsetConfig, ExtractError> {
        config
            .extract
            .validate()
            .map_err(ExtractError::ConfigError)?;
        Ok(config)
    }
}
