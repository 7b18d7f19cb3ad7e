//! Skill tags advertised by agents.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Capability tag carried by an agent node, e.g. `python` or `devops`.
///
/// Skills keep the spelling they were declared with. Matching against task
/// text is case-insensitive.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Skill(String);

impl Skill {
    /// Creates a new skill tag after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSkill`] if the tag is blank.
    pub fn new(skill: impl Into<String>) -> Result<Self> {
        let skill = skill.into();
        validate_skill(&skill)?;
        Ok(Self(skill))
    }

    /// Returns the skill tag as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the lowercased tag occurs inside `lowered_text`.
    ///
    /// The caller lowercases the text once so that many skills can be tested
    /// against it without repeated allocation.
    #[must_use]
    pub fn occurs_in_lowercase(&self, lowered_text: &str) -> bool {
        lowered_text.contains(&self.0.to_lowercase())
    }

    /// Returns `true` when the tag occurs in `text`, ignoring case.
    #[must_use]
    pub fn occurs_in(&self, text: &str) -> bool {
        self.occurs_in_lowercase(&text.to_lowercase())
    }
}

fn validate_skill(skill: &str) -> Result<()> {
    if skill.trim().is_empty() {
        return Err(Error::InvalidSkill {
            skill: skill.into(),
            reason: "skill cannot be blank".into(),
        });
    }
    Ok(())
}

impl Display for Skill {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Skill {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Skill {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Skill> for String {
    fn from(value: Skill) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        let skill = Skill::new("Python").expect("skill");
        assert!(skill.occurs_in("Need PYTHON help"));
        assert!(skill.occurs_in_lowercase("write some python"));
        assert!(!skill.occurs_in("need rust help"));
    }

    #[test]
    fn substring_match_is_crude() {
        let skill = Skill::new("ops").expect("skill");
        assert!(skill.occurs_in("devops pipeline"));
    }

    #[test]
    fn blank_skill_rejected() {
        let err = Skill::new("   ").expect_err("blank skill");
        assert!(matches!(err, Error::InvalidSkill { .. }));
    }

    #[test]
    fn long_skill_accepted() {
        let phrase = "distributed systems performance engineering ".repeat(4);
        let skill = Skill::new(phrase.trim()).expect("long skill");
        assert!(skill.as_str().len() > 64);
        assert!(skill.occurs_in(&format!("we need {phrase}now")));
    }
}
