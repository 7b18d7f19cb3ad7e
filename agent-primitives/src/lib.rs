//! Core shared types for AVE agents.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod ids;
mod profile;
mod skill;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Unique identifier for an agent within a social graph.
pub use ids::AgentId;
/// Declared skills and acquaintances of a single agent.
pub use profile::{AgentProfile, AgentProfileBuilder};
/// Capability tags advertised by agents.
pub use skill::Skill;
