//! Serializable node/link view of a social graph for visualisation.

use std::collections::BTreeSet;

use agent_primitives::{AgentId, Skill};
use serde::Serialize;

use crate::graph::SocialGraph;

/// Flat export of a graph: one entry per agent and one per undirected edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    /// Agents in construction order.
    pub nodes: Vec<SnapshotNode>,
    /// Each edge exactly once, oriented from the earlier agent to the later one.
    pub links: Vec<SnapshotLink>,
}

/// Agent entry of a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotNode {
    /// Agent identifier.
    pub id: AgentId,
    /// Advertised skills.
    pub skills: BTreeSet<Skill>,
    /// Number of distinct linked agents.
    pub degree: usize,
}

/// Edge entry of a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotLink {
    /// Endpoint declared first in the graph.
    pub source: AgentId,
    /// Endpoint declared later, or the same agent for a self-link.
    pub target: AgentId,
}

impl SocialGraph {
    /// Exports nodes and deduplicated links.
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        let nodes = self.nodes();
        let adjacency = self.adjacency();

        let snapshot_nodes = nodes
            .iter()
            .zip(adjacency)
            .map(|(node, neighbors)| SnapshotNode {
                id: node.id().clone(),
                skills: node.skills().clone(),
                degree: neighbors.len(),
            })
            .collect();

        let links = adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |&&to| to >= from)
                    .map(move |&to| SnapshotLink {
                        source: nodes[from].id().clone(),
                        target: nodes[to].id().clone(),
                    })
            })
            .collect();

        GraphSnapshot {
            nodes: snapshot_nodes,
            links,
        }
    }
}
