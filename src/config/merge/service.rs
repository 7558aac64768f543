//! MergeService: orchestrates sources, deserializes to HfsubsetConfig.

use crate::config::sources::{environment, global_file, working_file};
use crate::config::HfsubsetConfig;
use config::{Config, ConfigError, File};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the standard sources.
    /// Precedence: global file (lowest) -> working-directory file -> environment (highest).
    pub fn load(working_dir: &Path) -> Result<HfsubsetConfig, ConfigError> {
        let builder = Config::builder();
        let builder = global_file::add_to_builder(builder)?;
        let builder = working_file::add_to_builder(builder, working_dir)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<HfsubsetConfig, ConfigError> {
        let builder = Config::builder().add_source(File::from(path));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
