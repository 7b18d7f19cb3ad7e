//! Shared error definitions for agent primitives.

use thiserror::Error;

/// Result alias used throughout the agent runtime.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating agent primitive types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The provided agent identifier failed validation.
    #[error("invalid agent id `{id}`: {reason}")]
    InvalidAgentId {
        /// The offending identifier string.
        id: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Skill tag failed validation.
    #[error("invalid skill `{skill}`: {reason}")]
    InvalidSkill {
        /// The offending skill string.
        skill: String,
        /// Human-readable reason for rejection.
        reason: String,
    },
}
