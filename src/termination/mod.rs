//! Termination policies governing when a conversation stops.

use regex::Regex;

use crate::types::ChatMessage;

/// Decides whether a received message ends the conversation for an agent.
///
/// A closed set of named policies rather than arbitrary closures, so a
/// session's stopping rule can be inspected and logged.
#[derive(Debug, Clone, Default)]
pub enum TerminationPolicy {
    /// Never terminates.
    #[default]
    Never,
    /// Terminate when the message text contains the marker.
    ContainsMarker(String),
    /// Terminate when the message text matches the pattern.
    MatchesPattern(Regex),
    /// Terminate once the session has exchanged this many messages.
    RoundLimit(usize),
}

impl TerminationPolicy {
    /// Policy matching any message whose text contains `marker`.
    pub fn contains_marker(marker: impl Into<String>) -> Self {
        Self::ContainsMarker(marker.into())
    }

    /// Policy matching any message whose text matches `pattern`.
    pub fn matches_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::MatchesPattern(Regex::new(pattern)?))
    }

    /// Check the policy against the most recent message and the current
    /// number of exchanged messages.
    pub fn matches(&self, message: &ChatMessage, round_count: usize) -> bool {
        match self {
            Self::Never => false,
            Self::ContainsMarker(marker) => message.text().contains(marker),
            Self::MatchesPattern(pattern) => pattern.is_match(&message.text()),
            Self::RoundLimit(limit) => round_count >= *limit,
        }
    }
}
