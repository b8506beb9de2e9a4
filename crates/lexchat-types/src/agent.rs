//! Agent profile types.
//!
//! An agent profile pairs a fixed instruction string with the trigger
//! patterns that route a user message to it. The set of profiles is closed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of topical behavior modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Legislation,
    Contract,
    Jurisprudence,
    Doctrine,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Legislation => write!(f, "legislation"),
            AgentKind::Contract => write!(f, "contract"),
            AgentKind::Jurisprudence => write!(f, "jurisprudence"),
            AgentKind::Doctrine => write!(f, "doctrine"),
        }
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legislation" => Ok(AgentKind::Legislation),
            "contract" => Ok(AgentKind::Contract),
            "jurisprudence" => Ok(AgentKind::Jurisprudence),
            "doctrine" => Ok(AgentKind::Doctrine),
            other => Err(format!("invalid agent kind: '{other}'")),
        }
    }
}

/// A named instruction string plus the pattern that selects it.
///
/// `trigger` is a case-insensitive regular expression alternation matched
/// anywhere in the raw message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    pub kind: AgentKind,
    pub instruction: &'static str,
    pub trigger: &'static str,
}
