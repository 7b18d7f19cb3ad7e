//! Undirected acquaintance graph with breadth-first queries.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use agent_primitives::{AgentId, AgentProfile, Skill};
use serde::Serialize;
use tracing::debug;

use crate::error::{SocialError, SocialResult};

/// Hop limit used by [`SocialGraph::get_neighbors_default`].
pub const DEFAULT_NEIGHBOR_DEPTH: usize = 1;

/// Typed node record: the agent identifier and its advertised skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentNode {
    id: AgentId,
    skills: BTreeSet<Skill>,
}

impl AgentNode {
    /// Returns the agent identifier.
    #[must_use]
    pub fn id(&self) -> &AgentId {
        &self.id
    }

    /// Returns the agent's skills.
    #[must_use]
    pub fn skills(&self) -> &BTreeSet<Skill> {
        &self.skills
    }

    /// Returns `true` when any skill occurs inside the already lowercased text.
    #[must_use]
    pub fn has_skill_in(&self, lowered_text: &str) -> bool {
        self.skills
            .iter()
            .any(|skill| skill.occurs_in_lowercase(lowered_text))
    }
}

/// Social graph of agents, immutable once constructed.
///
/// Nodes keep the order in which they were supplied, and each adjacency list
/// keeps the order in which its edges were declared. Breadth-first results
/// follow those orders, so the same input always yields the same answers.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    nodes: Vec<AgentNode>,
    index: HashMap<AgentId, usize>,
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl SocialGraph {
    /// Builds a graph from agent profiles.
    ///
    /// Every profile becomes a node; every declared link becomes an undirected
    /// edge. Declaring a link on one side is enough, and duplicate edges
    /// collapse into one.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Construction`] when a link names an agent absent
    /// from the input, or [`SocialError::DuplicateAgent`] when an identifier
    /// is supplied twice.
    pub fn new<I>(agents: I) -> SocialResult<Self>
    where
        I: IntoIterator<Item = (AgentId, AgentProfile)>,
    {
        let mut nodes = Vec::new();
        let mut index = HashMap::new();
        let mut declared_links = Vec::new();

        for (id, profile) in agents {
            if index.contains_key(&id) {
                return Err(SocialError::DuplicateAgent { id });
            }
            let (skills, links) = profile.into_parts();
            index.insert(id.clone(), nodes.len());
            nodes.push(AgentNode { id, skills });
            declared_links.push(links);
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut edge_count = 0;

        // Links may point at agents declared later, so edges wait for all nodes.
        for (from, links) in declared_links.into_iter().enumerate() {
            for link in links {
                let Some(&to) = index.get(&link) else {
                    return Err(SocialError::Construction {
                        agent: nodes[from].id.clone(),
                        link,
                    });
                };
                if adjacency[from].contains(&to) {
                    continue;
                }
                adjacency[from].push(to);
                if from != to {
                    adjacency[to].push(from);
                }
                edge_count += 1;
            }
        }

        debug!(
            agents = nodes.len(),
            edges = edge_count,
            "social graph constructed"
        );

        Ok(Self {
            nodes,
            index,
            adjacency,
            edge_count,
        })
    }

    /// Starts building a graph from raw strings.
    #[must_use]
    pub fn builder() -> SocialGraphBuilder {
        SocialGraphBuilder::default()
    }

    /// Parses a JSON object mapping agent ids to `{ "skills", "links" }`.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Parse`] for malformed input and the construction
    /// errors of [`SocialGraph::new`].
    pub fn from_json(input: &str) -> SocialResult<Self> {
        let agents: BTreeMap<AgentId, AgentProfile> =
            serde_json::from_str(input).map_err(|err| SocialError::parse(err.to_string()))?;
        Self::new(agents)
    }

    /// Parses a TOML document whose tables are agent profiles.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Parse`] for malformed input and the construction
    /// errors of [`SocialGraph::new`].
    pub fn from_toml(input: &str) -> SocialResult<Self> {
        let agents: BTreeMap<AgentId, AgentProfile> =
            toml::from_str(input).map_err(|err| SocialError::parse(err.to_string()))?;
        Self::new(agents)
    }

    /// Returns the ids within `depth` hops of `agent`, the agent itself first.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::UnknownAgent`] if `agent` is not a node.
    pub fn get_neighbors(&self, agent: &str, depth: usize) -> SocialResult<Vec<AgentId>> {
        Ok(self
            .neighbor_distances(agent, depth)?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    /// [`SocialGraph::get_neighbors`] with [`DEFAULT_NEIGHBOR_DEPTH`].
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::UnknownAgent`] if `agent` is not a node.
    pub fn get_neighbors_default(&self, agent: &str) -> SocialResult<Vec<AgentId>> {
        self.get_neighbors(agent, DEFAULT_NEIGHBOR_DEPTH)
    }

    /// Returns reachable ids paired with their hop distance, in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::UnknownAgent`] if `agent` is not a node.
    pub fn neighbor_distances(
        &self,
        agent: &str,
        depth: usize,
    ) -> SocialResult<Vec<(AgentId, usize)>> {
        let start = self.index_of(agent)?;
        let reached = self
            .bfs_levels(start, depth)
            .into_iter()
            .map(|(node, distance)| (self.nodes[node].id.clone(), distance))
            .collect::<Vec<_>>();

        debug!(agent, depth, reached = reached.len(), "neighbor query");
        Ok(reached)
    }

    /// Returns one shortest path from `source` to `target`, both inclusive.
    ///
    /// `Ok(None)` means both agents exist but no chain of links joins them.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::UnknownAgent`] if either endpoint is not a node;
    /// the source is checked first.
    pub fn get_path(&self, source: &str, target: &str) -> SocialResult<Option<Vec<AgentId>>> {
        let start = self.index_of(source)?;
        let goal = self.index_of(target)?;

        if start == goal {
            return Ok(Some(vec![self.nodes[start].id.clone()]));
        }

        let mut parent = vec![None; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        visited[start] = true;
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for &next in &self.adjacency[current] {
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                parent[next] = Some(current);
                if next == goal {
                    return Ok(Some(self.trace_path(&parent, goal)));
                }
                queue.push_back(next);
            }
        }

        debug!(source, target, "no path between agents");
        Ok(None)
    }

    /// Returns `true` when `agent` is a node of the graph.
    #[must_use]
    pub fn contains(&self, agent: &str) -> bool {
        self.index.contains_key(agent)
    }

    /// Returns the node record for `agent`, if present.
    #[must_use]
    pub fn node(&self, agent: &str) -> Option<&AgentNode> {
        self.index.get(agent).map(|&idx| &self.nodes[idx])
    }

    /// Returns the skills of `agent`.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::UnknownAgent`] if `agent` is not a node.
    pub fn skills(&self, agent: &str) -> SocialResult<&BTreeSet<Skill>> {
        let idx = self.index_of(agent)?;
        Ok(&self.nodes[idx].skills)
    }

    /// Returns the number of distinct agents linked to `agent`.
    ///
    /// A self-link counts once.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::UnknownAgent`] if `agent` is not a node.
    pub fn degree(&self, agent: &str) -> SocialResult<usize> {
        let idx = self.index_of(agent)?;
        Ok(self.adjacency[idx].len())
    }

    /// Iterates over nodes in construction order.
    pub fn agents(&self) -> impl Iterator<Item = &AgentNode> {
        self.nodes.iter()
    }

    /// Number of agents in the graph.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct undirected edges, self-links included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub(crate) fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    pub(crate) fn nodes(&self) -> &[AgentNode] {
        &self.nodes
    }

    fn index_of(&self, agent: &str) -> SocialResult<usize> {
        self.index
            .get(agent)
            .copied()
            .ok_or_else(|| SocialError::unknown_agent(agent))
    }

    fn bfs_levels(&self, start: usize, cutoff: usize) -> Vec<(usize, usize)> {
        let mut seen = vec![false; self.nodes.len()];
        seen[start] = true;
        let mut reached = vec![(start, 0)];
        let mut frontier = vec![start];
        let mut level = 0;

        while !frontier.is_empty() && level < cutoff {
            level += 1;
            let mut next_frontier = Vec::new();
            for &node in &frontier {
                for &next in &self.adjacency[node] {
                    if !seen[next] {
                        seen[next] = true;
                        reached.push((next, level));
                        next_frontier.push(next);
                    }
                }
            }
            frontier = next_frontier;
        }

        reached
    }

    fn trace_path(&self, parent: &[Option<usize>], goal: usize) -> Vec<AgentId> {
        let mut path = vec![goal];
        let mut current = goal;
        while let Some(previous) = parent[current] {
            path.push(previous);
            current = previous;
        }
        path.into_iter()
            .rev()
            .map(|idx| self.nodes[idx].id.clone())
            .collect()
    }
}

/// Builder collecting agents from raw strings before constructing a graph.
#[derive(Debug, Default)]
pub struct SocialGraphBuilder {
    agents: Vec<(AgentId, AgentProfile)>,
}

impl SocialGraphBuilder {
    /// Adds an agent with its skills and links.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::InvalidProfile`] when the id, a skill, or a link
    /// fails validation.
    pub fn agent<S, L>(mut self, id: impl Into<String>, skills: S, links: L) -> SocialResult<Self>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let id = AgentId::new(id)?;
        let mut profile = AgentProfile::builder();
        for skill in skills {
            profile = profile.skill(skill)?;
        }
        for link in links {
            profile = profile.link(link)?;
        }
        self.agents.push((id, profile.build()));
        Ok(self)
    }

    /// Adds an already validated profile.
    #[must_use]
    pub fn profile(mut self, id: AgentId, profile: AgentProfile) -> Self {
        self.agents.push((id, profile));
        self
    }

    /// Constructs the graph.
    ///
    /// # Errors
    ///
    /// Propagates the construction errors of [`SocialGraph::new`].
    pub fn build(self) -> SocialResult<SocialGraph> {
        SocialGraph::new(self.agents)
    }
}
