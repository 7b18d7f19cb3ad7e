//! Error types for social graph construction and queries.

use agent_primitives::AgentId;
use thiserror::Error;

/// Errors emitted by the social graph.
#[derive(Debug, Error)]
pub enum SocialError {
    /// A declared link references an agent missing from the input mapping.
    #[error("agent `{agent}` links to unknown agent `{link}`")]
    Construction {
        /// Agent whose profile declared the link.
        agent: AgentId,
        /// Identifier that could not be resolved.
        link: AgentId,
    },

    /// The same agent identifier was supplied twice.
    #[error("agent `{id}` declared more than once")]
    DuplicateAgent {
        /// Identifier that appeared twice.
        id: AgentId,
    },

    /// A query referenced an agent that is not a node of the graph.
    #[error("agent `{id}` is not part of the social graph")]
    UnknownAgent {
        /// Identifier supplied by the caller.
        id: String,
    },

    /// An agent profile failed primitive validation.
    #[error("invalid agent profile: {source}")]
    InvalidProfile {
        /// Source validation error.
        #[from]
        source: agent_primitives::Error,
    },

    /// A serialized graph definition could not be parsed.
    #[error("failed to parse social graph definition: {reason}")]
    Parse {
        /// Human-readable parser message.
        reason: String,
    },
}

impl SocialError {
    /// Helper to construct unknown-agent errors from string-like values.
    #[must_use]
    pub fn unknown_agent(id: impl Into<String>) -> Self {
        Self::UnknownAgent { id: id.into() }
    }

    /// Helper to construct parse errors from string-like values.
    #[must_use]
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}

/// Result type alias for social graph operations.
pub type SocialResult<T> = Result<T, SocialError>;
