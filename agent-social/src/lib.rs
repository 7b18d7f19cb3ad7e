//! Social graph of agents and skill-based peer discovery.
//!
//! A [`SocialGraph`] records which agents know each other and which skills
//! they advertise. Neighborhood and path queries run breadth-first over an
//! explicit adjacency structure, and [`find_potential_peers`] layers a
//! keyword heuristic on top to shortlist collaborators for a task.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod graph;
mod peers;
mod snapshot;

pub use error::{SocialError, SocialResult};
pub use graph::{AgentNode, DEFAULT_NEIGHBOR_DEPTH, SocialGraph, SocialGraphBuilder};
pub use peers::{
    DEFAULT_SEARCH_DEPTH, PeerFinder, find_potential_peers, find_potential_peers_default,
};
pub use snapshot::{GraphSnapshot, SnapshotLink, SnapshotNode};
