//! Agent identifier types.

use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Unique identifier for an agent participating in a social graph.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentId(String);

impl AgentId {
    /// Creates an identifier after validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAgentId`] if the identifier is empty or contains
    /// control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, Error> {
        let id = id.into();
        validate_identifier(&id)?;
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_identifier(id: &str) -> Result<(), Error> {
    if id.trim().is_empty() {
        return Err(Error::InvalidAgentId {
            id: id.into(),
            reason: "identifier cannot be empty".into(),
        });
    }

    if id.chars().any(char::is_control) {
        return Err(Error::InvalidAgentId {
            id: id.into(),
            reason: "identifier cannot contain control characters".into(),
        });
    }

    Ok(())
}

impl Display for AgentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AgentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for AgentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AgentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<String> for AgentId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for AgentId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgentId> for String {
    fn from(value: AgentId) -> Self {
        value.0
    }
}

impl FromStr for AgentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_agent_id() {
        let id = AgentId::new("agent-7").expect("id");
        let parsed = id.to_string().parse::<AgentId>().expect("parse");
        assert_eq!(id, parsed);
        assert_eq!(id, "agent-7");
    }

    #[test]
    fn rejects_blank_and_control_characters() {
        assert!(matches!(
            AgentId::new("  "),
            Err(Error::InvalidAgentId { .. })
        ));
        assert!(AgentId::new("bad\nid").is_err());
    }

    #[test]
    fn long_identifiers_accepted() {
        let long = format!("agent-{}", "x".repeat(200));
        let id = AgentId::new(long.clone()).expect("long id");
        assert_eq!(id.as_str(), long);
    }

    #[test]
    fn deserializes_through_validation() {
        let id: AgentId = serde_json::from_str("\"planner\"").expect("deserialize");
        assert_eq!(id.as_str(), "planner");

        let err = serde_json::from_str::<AgentId>("\"\"");
        assert!(err.is_err());
    }
}
