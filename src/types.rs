//! Core types shared across the hydrofabric subsetting pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// NodeId: identifier of a nexus, flowpath, or implicit graph node (e.g. `wb-12`)
pub type NodeId = String;

/// DivideId: identifier of a catchment divide (e.g. `cat-12`)
pub type DivideId = String;

/// The five hydrofabric layers an extraction reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    #[serde(rename = "divides")]
    Divides,
    #[serde(rename = "nexus")]
    Nexus,
    #[serde(rename = "flowpaths")]
    Flowpaths,
    #[serde(rename = "flowpath-attributes")]
    FlowpathAttributes,
    #[serde(rename = "network")]
    Network,
}

impl Layer {
    /// Order in which layers are written to an output container
    pub const EXPORT_ORDER: [Layer; 5] = [
        Layer::Divides,
        Layer::Nexus,
        Layer::Flowpaths,
        Layer::FlowpathAttributes,
        Layer::Network,
    ];

    /// Layer name as stored in a container
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Divides => "divides",
            Layer::Nexus => "nexus",
            Layer::Flowpaths => "flowpaths",
            Layer::FlowpathAttributes => "flowpath-attributes",
            Layer::Network => "network",
        }
    }

    /// Column each layer is subset on
    pub fn key_column(&self) -> &'static str {
        match self {
            Layer::Divides | Layer::Network => "divide_id",
            Layer::Nexus | Layer::Flowpaths => "id",
            Layer::FlowpathAttributes => "link",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
