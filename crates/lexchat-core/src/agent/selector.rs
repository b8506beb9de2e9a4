//! AgentSelector -- routes a user message to one agent profile.
//!
//! Triggers are tested in a fixed order against the raw message text,
//! case-insensitively and anywhere in the text. The first match wins, and a
//! message that matches nothing gets the default profile.

use regex::{Regex, RegexBuilder};

use lexchat_types::agent::AgentProfile;

use super::prompt::{DEFAULT_PROFILE, PROFILES};

/// Compiled trigger table. Build once at startup and share.
#[derive(Debug, Clone)]
pub struct AgentSelector {
    rules: Vec<(Regex, &'static AgentProfile)>,
    default: &'static AgentProfile,
}

impl AgentSelector {
    /// Compile the built-in profile triggers.
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_profiles(&PROFILES, DEFAULT_PROFILE)
    }

    /// Compile an explicit ordered profile list.
    pub fn with_profiles(
        profiles: &[&'static AgentProfile],
        default: &'static AgentProfile,
    ) -> Result<Self, regex::Error> {
        let rules = profiles
            .iter()
            .map(|profile| {
                RegexBuilder::new(profile.trigger)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (re, *profile))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules, default })
    }

    /// Pick the profile for `message`. Total and side-effect free.
    pub fn select(&self, message: &str) -> &'static AgentProfile {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(message))
            .map(|(_, profile)| *profile)
            .unwrap_or(self.default)
    }
}
