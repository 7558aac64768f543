//! Network graph construction
//!
//! Nodes are nexus points plus any identifier a flowpath references; edges run
//! from a flowpath's own id to its `toid`. When a flowpath drains into a nexus
//! that itself has a downstream `toid`, a payload-free link edge bridges the
//! nexus to that target so traversal continues past it.

use super::records::{FlowpathEdge, NexusNode};
use crate::error::ExtractError;
use crate::table::Table;
use crate::types::NodeId;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Graph node payload
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkNode {
    Nexus(NexusNode),
    /// Referenced by a flowpath but not present in the nexus layer
    Implicit(NodeId),
}

impl NetworkNode {
    pub fn id(&self) -> &str {
        match self {
            NetworkNode::Nexus(nexus) => &nexus.id,
            NetworkNode::Implicit(id) => id,
        }
    }
}

/// Graph edge payload
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEdge {
    Flowpath(FlowpathEdge),
    /// Nexus to its downstream target
    Link,
}

/// Directed hydrofabric network
///
/// Parallel edges are allowed; the graph is only used for reachability.
#[derive(Debug, Default)]
pub struct HydroNetwork {
    pub(crate) graph: DiGraph<NetworkNode, NetworkEdge>,
    pub(crate) index: HashMap<NodeId, NodeIndex>,
}

impl HydroNetwork {
    /// Build the network from already-parsed records
    pub fn build(nexus: &[NexusNode], flowpaths: &[FlowpathEdge]) -> Self {
        let mut network = HydroNetwork::default();

        for node in nexus {
            network.insert_nexus(node.clone());
        }

        let downstream_of: HashMap<&str, &str> = nexus
            .iter()
            .filter_map(|n| n.toid.as_deref().map(|toid| (n.id.as_str(), toid)))
            .collect();

        let flowpath_ids: HashSet<&str> = flowpaths.iter().map(|f| f.id.as_str()).collect();

        let mut dangling = 0usize;
        for edge in flowpaths {
            let source = network.ensure_node(&edge.id);
            let Some(toid) = edge.toid.as_deref() else {
                debug!(flowpath = %edge.id, "Flowpath has no toid, leaving it as a terminal node");
                continue;
            };
            if !flowpath_ids.contains(toid) && network.nexus(toid).is_none() {
                dangling += 1;
            }
            let target = network.ensure_node(toid);
            network
                .graph
                .add_edge(source, target, NetworkEdge::Flowpath(edge.clone()));

            if let Some(&next) = downstream_of.get(toid) {
                let next = network.ensure_node(next);
                network.graph.add_edge(target, next, NetworkEdge::Link);
            }
        }

        if dangling > 0 {
            warn!(
                dangling,
                "Flowpaths reference toid values absent from both nexus and flowpath layers"
            );
        }
        debug!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "Built hydrofabric network"
        );
        network
    }

    /// Parse the `nexus` and `flowpaths` layers and build the network
    pub fn from_tables(nexus: &Table, flowpaths: &Table) -> Result<Self, ExtractError> {
        let nexus = NexusNode::from_table(nexus)?;
        let flowpaths = FlowpathEdge::from_table(flowpaths)?;
        Ok(Self::build(&nexus, &flowpaths))
    }

    fn insert_nexus(&mut self, node: NexusNode) {
        match self.index.get(&node.id) {
            Some(&idx) => {
                warn!(nexus = %node.id, "Duplicate nexus id, keeping the last record");
                self.graph[idx] = NetworkNode::Nexus(node);
            }
            None => {
                let id = node.id.clone();
                let idx = self.graph.add_node(NetworkNode::Nexus(node));
                self.index.insert(id, idx);
            }
        }
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(NetworkNode::Implicit(id.to_string()));
        self.index.insert(id.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub(crate) fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Nexus payload for `id`, if `id` is a nexus
    pub fn nexus(&self, id: &str) -> Option<&NexusNode> {
        match &self.graph[self.node_index(id)?] {
            NetworkNode::Nexus(nexus) => Some(nexus),
            NetworkNode::Implicit(_) => None,
        }
    }
}
