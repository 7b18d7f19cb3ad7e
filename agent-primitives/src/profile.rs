//! Declared skills and acquaintances of an agent.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{AgentId, Skill};

/// Construction-time record describing one agent of a social graph.
///
/// Links are kept in declaration order; the graph deduplicates them when it
/// builds its adjacency lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    #[serde(default)]
    skills: BTreeSet<Skill>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    links: Vec<AgentId>,
}

impl AgentProfile {
    /// Creates a profile from already validated parts.
    #[must_use]
    pub fn new(skills: BTreeSet<Skill>, links: Vec<AgentId>) -> Self {
        Self { skills, links }
    }

    /// Starts building an [`AgentProfile`] from raw strings.
    #[must_use]
    pub fn builder() -> AgentProfileBuilder {
        AgentProfileBuilder::default()
    }

    /// Returns the declared skills.
    #[must_use]
    pub fn skills(&self) -> &BTreeSet<Skill> {
        &self.skills
    }

    /// Returns the declared links in declaration order.
    #[must_use]
    pub fn links(&self) -> &[AgentId] {
        &self.links
    }

    /// Splits the profile into its skills and links.
    #[must_use]
    pub fn into_parts(self) -> (BTreeSet<Skill>, Vec<AgentId>) {
        (self.skills, self.links)
    }
}

/// Builder for [`AgentProfile`].
#[derive(Debug, Default)]
pub struct AgentProfileBuilder {
    skills: BTreeSet<Skill>,
    links: Vec<AgentId>,
}

impl AgentProfileBuilder {
    /// Adds a skill tag.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidSkill`] when the tag is blank.
    pub fn skill(mut self, skill: impl Into<String>) -> crate::Result<Self> {
        self.skills.insert(Skill::new(skill)?);
        Ok(self)
    }

    /// Adds a link to another agent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAgentId`] when the identifier is invalid.
    pub fn link(mut self, agent: impl Into<String>) -> crate::Result<Self> {
        self.links.push(AgentId::new(agent)?);
        Ok(self)
    }

    /// Consumes the builder and returns the profile.
    #[must_use]
    pub fn build(self) -> AgentProfile {
        AgentProfile {
            skills: self.skills,
            links: self.links,
        }
    }
}
