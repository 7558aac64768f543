//! Upstream closure
//!
//! Reverse breadth-first search from a seed node over incoming edges. Only the
//! part of the graph that drains into the seed is touched.

use super::graph::HydroNetwork;
use crate::error::ExtractError;
use crate::types::NodeId;
use petgraph::Direction;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Every node with a directed path to `source`, excluding `source` itself
pub fn resolve_upstream(
    network: &HydroNetwork,
    source: &str,
) -> Result<HashSet<NodeId>, ExtractError> {
    resolve_upstream_bounded(network, source, None)
}

/// As `resolve_upstream`, failing once the closure grows past `limit` nodes
///
/// A visited set guards the walk, so a cycle in malformed data terminates
/// instead of looping.
pub fn resolve_upstream_bounded(
    network: &HydroNetwork,
    source: &str,
    limit: Option<usize>,
) -> Result<HashSet<NodeId>, ExtractError> {
    let start = network
        .node_index(source)
        .ok_or_else(|| ExtractError::NodeNotFound(source.to_string()))?;

    let mut visited = vec![false; network.graph.node_count()];
    visited[start.index()] = true;
    let mut queue = VecDeque::from([start]);
    let mut upstream = HashSet::new();

    while let Some(current) = queue.pop_front() {
        for parent in network
            .graph
            .neighbors_directed(current, Direction::Incoming)
        {
            if visited[parent.index()] {
                continue;
            }
            visited[parent.index()] = true;
            upstream.insert(network.graph[parent].id().to_string());
            if let Some(limit) = limit {
                if upstream.len() > limit {
                    return Err(ExtractError::UpstreamLimitExceeded {
                        seed: source.to_string(),
                        limit,
                    });
                }
            }
            queue.push_back(parent);
        }
    }

    debug!(seed = source, upstream = upstream.len(), "Resolved upstream closure");
    Ok(upstream)
}
