//! Append-only session history.

use serde::{Deserialize, Serialize};

use crate::types::ChatMessage;

/// Why a session stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionEnd {
    /// A participant's termination policy matched the message it received.
    TerminalMessage { agent: String },
    /// The human boundary signalled "no input".
    HumanEnded { agent: String },
    /// The exchanged-message limit was reached.
    RoundLimit,
    /// An agent's auto-reply budget ran out with no human fallback.
    AutoRepliesExhausted { agent: String },
    /// Inference failure or unknown speaker; history is preserved.
    Failed { error: String },
}

/// Ordered message history of one session.
///
/// Messages are only appended, never reordered or removed. `round_count`
/// is the number of exchanged messages. Termination is monotonic: once
/// terminated, pushes are ignored and the end reason never changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    end: Option<SessionEnd>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages exchanged so far.
    pub fn round_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.end.is_some()
    }

    pub fn end(&self) -> Option<&SessionEnd> {
        self.end.as_ref()
    }

    /// Append a message. Returns `false` (and appends nothing) once the
    /// session has terminated.
    pub fn push(&mut self, message: ChatMessage) -> bool {
        if self.is_terminated() {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Record the end of the session. The first reason wins; later calls
    /// are ignored.
    pub fn terminate(&mut self, end: SessionEnd) {
        if self.end.is_none() {
            self.end = Some(end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_in_order_and_counts_rounds() {
        let mut transcript = Transcript::new();
        assert!(transcript.push(ChatMessage::user("one")));
        assert!(transcript.push(ChatMessage::assistant("two")));
        assert_eq!(transcript.round_count(), 2);
        assert_eq!(transcript.messages()[0].text(), "one");
        assert_eq!(transcript.last().unwrap().text(), "two");
    }

    #[test]
    fn push_after_termination_appends_nothing() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("only"));
        transcript.terminate(SessionEnd::RoundLimit);

        assert!(!transcript.push(ChatMessage::assistant("late")));
        assert_eq!(transcript.round_count(), 1);
    }

    #[test]
    fn first_end_reason_wins() {
        let mut transcript = Transcript::new();
        transcript.terminate(SessionEnd::TerminalMessage {
            agent: "user".into(),
        });
        transcript.terminate(SessionEnd::RoundLimit);

        assert_eq!(
            transcript.end(),
            Some(&SessionEnd::TerminalMessage {
                agent: "user".into()
            })
        );
    }
}
