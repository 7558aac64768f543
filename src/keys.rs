//! Entity key mapping
//!
//! Divides are keyed `cat-<n>` while nexus and flowpath ids carry their own
//! category prefix (`wb-<n>`, `nex-<n>`, `tnx-<n>`). The divide id of a node is
//! its numeric suffix under the `cat` prefix.

use crate::error::ExtractError;
use crate::types::{DivideId, NodeId};
use std::collections::HashSet;

/// Prefix of every divide identifier
pub const DIVIDE_PREFIX: &str = "cat";

const SEPARATOR: char = '-';

/// Divide id derived from a nexus or flowpath id
///
/// The id must be exactly `<prefix>-<digits>` with a non-empty prefix.
pub fn divide_id_for(id: &str) -> Result<DivideId, ExtractError> {
    let malformed = || ExtractError::MalformedIdentifier(id.to_string());
    let (prefix, suffix) = id.split_once(SEPARATOR).ok_or_else(malformed)?;
    if prefix.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    Ok(format!("{}{}{}", DIVIDE_PREFIX, SEPARATOR, suffix))
}

/// Key sets every layer is subset on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetKeys {
    /// Upstream closure plus the seed; keys nexus, flowpaths and flowpath attributes
    pub node_ids: HashSet<NodeId>,
    /// Derived divide ids; keys divides and network
    pub divide_ids: HashSet<DivideId>,
}

impl SubsetKeys {
    /// Add `seed` to its upstream closure and derive the divide ids
    ///
    /// Any malformed identifier aborts the derivation.
    pub fn derive(mut upstream: HashSet<NodeId>, seed: &str) -> Result<Self, ExtractError> {
        upstream.insert(seed.to_string());
        let divide_ids = upstream
            .iter()
            .map(|id| divide_id_for(id))
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self {
            node_ids: upstream,
            divide_ids,
        })
    }

    /// Join keys for the `flowpath-attributes` layer; raw node ids, untransformed
    pub fn attribute_links(&self) -> &HashSet<NodeId> {
        &self.node_ids
    }
}
