//! Nested reflection chats folded back into an outer turn.

use std::sync::Arc;

use super::summary::SummaryMethod;
use super::transcript::Transcript;
use crate::agent::Agent;
use crate::error::{ParleyError, Result};

/// Pure function producing a nested chat's opening message from
/// `(recipient_name, outer_history, sender_name)`.
pub type MessageFn = Arc<dyn Fn(&str, &Transcript, &str) -> String + Send + Sync>;

/// A sub-conversation run to completion whenever the named trigger agent
/// is about to reply; its summary becomes the trigger's reply.
pub struct NestedChat {
    pub(crate) trigger: String,
    pub(crate) partner: Agent,
    pub(crate) message: MessageFn,
    pub(crate) summary_method: SummaryMethod,
    pub(crate) max_rounds: usize,
}

impl NestedChat {
    /// Create a nested chat supplying replies for the `trigger` agent,
    /// conversing with `partner`. By default the nested chat opens with
    /// the outer session's last message text.
    pub fn new(trigger: impl Into<String>, partner: Agent) -> Self {
        Self {
            trigger: trigger.into(),
            partner,
            message: Arc::new(|_, history, _| {
                history.last().map(|m| m.text()).unwrap_or_default()
            }),
            summary_method: SummaryMethod::default(),
            max_rounds: super::pair::DEFAULT_MAX_ROUNDS,
        }
    }

    /// Set the opening-message function.
    pub fn with_message<F>(mut self, message: F) -> Self
    where
        F: Fn(&str, &Transcript, &str) -> String + Send + Sync + 'static,
    {
        self.message = Arc::new(message);
        self
    }

    /// Set how the nested transcript is condensed into the injected reply.
    pub fn with_summary_method(mut self, method: SummaryMethod) -> Self {
        self.summary_method = method;
        self
    }

    /// Bound the nested session independently of the outer one.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub(crate) fn validate(&self, participant_names: &[&str]) -> Result<()> {
        if !participant_names.contains(&self.trigger.as_str()) {
            return Err(ParleyError::Configuration(format!(
                "nested chat trigger '{}' is not a session participant",
                self.trigger
            )));
        }
        if self.partner.name() == self.trigger {
            return Err(ParleyError::Configuration(format!(
                "nested chat partner '{}' shares its name with the trigger",
                self.trigger
            )));
        }
        self.partner.validate()
    }
}

impl std::fmt::Debug for NestedChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedChat")
            .field("trigger", &self.trigger)
            .field("partner", &self.partner.name())
            .field("summary_method", &self.summary_method)
            .field("max_rounds", &self.max_rounds)
            .finish()
    }
}
