//! Team roster: the fixed set of people an entry can be assigned to.

use serde::{Deserialize, Serialize};

/// Placeholder member used when no team is configured.
pub const UNASSIGNED: &str = "Unassigned";

/// Ordered list of persons in charge (PICs).
///
/// The first member is the default for newly created entries. Deserializing
/// goes through [`Roster::new`], so a roster is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    members: Vec<String>,
}

impl Roster {
    /// Build a roster, dropping blank and duplicate names.
    ///
    /// An empty result falls back to the default roster.
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cleaned: Vec<String> = Vec::new();
        for member in members {
            let member = member.into().trim().to_string();
            if !member.is_empty() && !cleaned.contains(&member) {
                cleaned.push(member);
            }
        }
        if cleaned.is_empty() {
            return Self::default();
        }
        Self { members: cleaned }
    }

    /// Parse a comma separated list, e.g. `"Alice, Bob"`.
    pub fn parse_list(input: &str) -> Self {
        Self::new(input.split(','))
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// The create-mode default.
    pub fn default_member(&self) -> &str {
        // Construction guarantees at least one member.
        self.members.first().map(String::as_str).unwrap_or(UNASSIGNED)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

impl From<Vec<String>> for Roster {
    fn from(members: Vec<String>) -> Self {
        Self::new(members)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.members
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            members: vec![UNASSIGNED.to_string()],
        }
    }
}
