//! Sequential session lists: one conversation after another, each seeded
//! with the summaries of the ones before it.

use tracing::{debug, warn};

use super::pair::{PairChat, DEFAULT_MAX_ROUNDS};
use super::summary::SummaryMethod;
use super::transcript::SessionEnd;
use crate::agent::Agent;
use crate::error::Result;

/// One entry in a sequential run: who the initiator talks to, how the
/// conversation opens, and how it is wrapped up.
pub struct ChatSpec {
    recipient: Agent,
    opening: String,
    clear_history: bool,
    summary_method: SummaryMethod,
    max_rounds: usize,
}

impl ChatSpec {
    pub fn new(recipient: Agent, opening: impl Into<String>) -> Self {
        Self {
            recipient,
            opening: opening.into(),
            clear_history: false,
            summary_method: SummaryMethod::default(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Discard the recipient's memory of prior sessions before starting.
    pub fn with_clear_history(mut self, clear: bool) -> Self {
        self.clear_history = clear;
        self
    }

    pub fn with_summary_method(mut self, method: SummaryMethod) -> Self {
        self.summary_method = method;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}

/// Outcome of one session in a sequential run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub recipient: String,
    pub summary: String,
    /// `false` marks the error entry of a session that failed; the
    /// sessions after it never ran.
    pub completed: bool,
}

/// Run the sessions strictly in order, returning one summary per session
/// that started.
///
/// Summaries of completed sessions are appended to the next opening as
/// context. A failed session contributes an error-marker summary and
/// aborts the remainder; completed summaries are still returned. All
/// specs are validated before the first session starts.
pub async fn run_chat_sequence(
    initiator: &mut Agent,
    specs: Vec<ChatSpec>,
) -> Result<Vec<SessionSummary>> {
    initiator.validate()?;
    for spec in &specs {
        spec.recipient.validate()?;
        if spec.recipient.name() == initiator.name() {
            return Err(crate::error::ParleyError::Configuration(format!(
                "participants must have distinct names, got '{}' twice",
                initiator.name()
            )));
        }
    }

    let mut summaries: Vec<SessionSummary> = Vec::with_capacity(specs.len());
    for (index, mut spec) in specs.into_iter().enumerate() {
        let opening = seed_opening(&spec.opening, &summaries);
        debug!(index, recipient = %spec.recipient.name(), "starting session");

        let mut chat = PairChat::new()
            .with_max_rounds(spec.max_rounds)
            .with_summary_method(spec.summary_method)
            .with_clear_history(spec.clear_history);
        let outcome = chat
            .run(initiator, &mut spec.recipient, opening)
            .await?;

        match outcome.end() {
            Some(SessionEnd::Failed { error }) => {
                warn!(index, recipient = %spec.recipient.name(), error = %error, "session failed, aborting the rest");
                summaries.push(SessionSummary {
                    recipient: spec.recipient.name().to_string(),
                    summary: error.clone(),
                    completed: false,
                });
                break;
            }
            _ => summaries.push(SessionSummary {
                recipient: spec.recipient.name().to_string(),
                summary: outcome.summary,
                completed: true,
            }),
        }
    }
    Ok(summaries)
}

/// Fold prior summaries into the next opening message.
fn seed_opening(opening: &str, summaries: &[SessionSummary]) -> String {
    if summaries.is_empty() {
        return opening.to_string();
    }
    let context: Vec<&str> = summaries
        .iter()
        .filter(|s| s.completed)
        .map(|s| s.summary.as_str())
        .collect();
    if context.is_empty() {
        return opening.to_string();
    }
    format!("{opening}\nContext:\n{}", context.join("\n"))
}
