//! Environment variable source: HFSUBSET_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// Uses HFSUBSET prefix and __ as separator for nested keys, e.g.
/// `HFSUBSET__EXTRACT__MAX_UPSTREAM_NODES=5000`. Attribute columns are
/// comma separated.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("HFSUBSET")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("extract.attribute_columns"),
    );
    Ok(builder)
}
