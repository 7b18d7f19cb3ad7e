//! Skill-keyword peer discovery over the social graph.

use agent_primitives::AgentId;
use tracing::debug;

use crate::error::SocialResult;
use crate::graph::SocialGraph;

/// Hop limit used when no explicit search depth is configured.
pub const DEFAULT_SEARCH_DEPTH: usize = 2;

/// Returns nearby agents whose skills appear in the task description.
///
/// A neighbor qualifies when at least one of its skills, lowercased, is a
/// substring of the lowercased task description. Results follow the
/// breadth-first discovery order of [`SocialGraph::get_neighbors`], never
/// include the requesting agent, and list each peer once.
///
/// An empty task, an empty agent id, or a missing graph yields an empty list
/// rather than an error.
///
/// # Errors
///
/// Returns [`crate::SocialError::UnknownAgent`] when `agent_id` is non-empty
/// but not a node of `graph`.
pub fn find_potential_peers(
    task_description: &str,
    agent_id: &str,
    graph: Option<&SocialGraph>,
    search_depth: usize,
) -> SocialResult<Vec<AgentId>> {
    let Some(graph) = graph else {
        return Ok(Vec::new());
    };
    if task_description.is_empty() || agent_id.is_empty() {
        return Ok(Vec::new());
    }

    let task = task_description.to_lowercase();
    let peers: Vec<AgentId> = graph
        .get_neighbors(agent_id, search_depth)?
        .into_iter()
        .filter(|neighbor| neighbor != agent_id)
        .filter(|neighbor| {
            graph
                .node(neighbor.as_str())
                .is_some_and(|node| node.has_skill_in(&task))
        })
        .collect();

    debug!(
        agent = agent_id,
        search_depth,
        matches = peers.len(),
        "peer search completed"
    );
    Ok(peers)
}

/// [`find_potential_peers`] with [`DEFAULT_SEARCH_DEPTH`].
///
/// # Errors
///
/// Same as [`find_potential_peers`].
pub fn find_potential_peers_default(
    task_description: &str,
    agent_id: &str,
    graph: Option<&SocialGraph>,
) -> SocialResult<Vec<AgentId>> {
    find_potential_peers(task_description, agent_id, graph, DEFAULT_SEARCH_DEPTH)
}

/// Peer search bound to one graph and a configured depth.
#[derive(Debug, Clone, Copy)]
pub struct PeerFinder<'g> {
    graph: &'g SocialGraph,
    search_depth: usize,
}

impl<'g> PeerFinder<'g> {
    /// Creates a finder using [`DEFAULT_SEARCH_DEPTH`].
    #[must_use]
    pub fn new(graph: &'g SocialGraph) -> Self {
        Self {
            graph,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }

    /// Overrides the hop limit.
    #[must_use]
    pub fn with_search_depth(mut self, search_depth: usize) -> Self {
        self.search_depth = search_depth;
        self
    }

    /// Returns the configured hop limit.
    #[must_use]
    pub const fn search_depth(&self) -> usize {
        self.search_depth
    }

    /// Finds peers of `agent_id` for the task.
    ///
    /// # Errors
    ///
    /// Same as [`find_potential_peers`].
    pub fn find(&self, task_description: &str, agent_id: &str) -> SocialResult<Vec<AgentId>> {
        find_potential_peers(task_description, agent_id, Some(self.graph), self.search_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SocialError, SocialGraphBuilder};

    fn trio() -> SocialGraph {
        SocialGraph::builder()
            .agent("A", ["python"], ["B"])
            .and_then(|b| b.agent("B", ["devops"], ["A", "C"]))
            .and_then(|b| b.agent("C", ["python"], ["B"]))
            .and_then(SocialGraphBuilder::build)
            .expect("graph")
    }

    #[test]
    fn finds_matching_peer_two_hops_away() {
        let graph = trio();
        let peers = find_potential_peers("need python help", "A", Some(&graph), 2).unwrap();
        assert_eq!(peers, ["C"]);
    }

    #[test]
    fn depth_limits_the_search() {
        let graph = trio();
        let peers = find_potential_peers("need python help", "A", Some(&graph), 1).unwrap();
        assert!(peers.is_empty());
    }

    #[test]
    fn degenerate_inputs_yield_empty() {
        let graph = trio();
        assert!(find_potential_peers("", "A", Some(&graph), 2).unwrap().is_empty());
        assert!(find_potential_peers("task", "", Some(&graph), 2).unwrap().is_empty());
        assert!(find_potential_peers("task", "A", None, 2).unwrap().is_empty());
    }

    #[test]
    fn unknown_agent_propagates() {
        let graph = trio();
        let err = find_potential_peers("python", "Z", Some(&graph), 2).expect_err("unknown");
        assert!(matches!(err, SocialError::UnknownAgent { .. }));
    }

    #[test]
    fn match_ignores_case_and_lists_peer_once() {
        let graph = SocialGraph::builder()
            .agent("A", ["rust"], ["B", "C"])
            .and_then(|b| b.agent("B", ["Python", "DevOps"], ["C"]))
            .and_then(|b| b.agent("C", ["go"], ["A"]))
            .and_then(SocialGraphBuilder::build)
            .expect("graph");

        let peers =
            find_potential_peers_default("PYTHON script for a devops job", "A", Some(&graph))
                .unwrap();
        assert_eq!(peers, ["B"]);
    }

    #[test]
    fn results_follow_discovery_order() {
        let graph = SocialGraph::builder()
            .agent("hub", ["ops"], ["z", "y"])
            .and_then(|b| b.agent("y", ["sql"], ["x"]))
            .and_then(|b| b.agent("z", ["sql"], ["hub"]))
            .and_then(|b| b.agent("x", ["sql"], ["y"]))
            .and_then(SocialGraphBuilder::build)
            .expect("graph");

        let finder = PeerFinder::new(&graph);
        assert_eq!(finder.search_depth(), DEFAULT_SEARCH_DEPTH);
        assert_eq!(finder.find("sql tuning", "hub").unwrap(), ["z", "y", "x"]);
        assert!(finder.find("sql tuning", "hub").unwrap().iter().all(|p| p != "hub"));
    }

    #[test]
    fn self_skill_never_returned() {
        let graph = trio();
        let finder = PeerFinder::new(&graph).with_search_depth(5);
        let peers = finder.find("python", "C").unwrap();
        assert_eq!(peers, ["A"]);
    }
}
