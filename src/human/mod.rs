//! Human input boundary.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ParleyError, Result};

/// What the human boundary hands back when consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanReply {
    /// Text the agent sends as its reply.
    Text(String),
    /// No input; treat as termination.
    EndSession,
}

/// External collaborator supplying human input at suspension points.
///
/// Calls block the session until input arrives. No timeout is imposed
/// here; an implementation that needs one must enforce it itself.
#[async_trait]
pub trait HumanInput: Send + Sync {
    async fn read(&self, prompt: &str) -> Result<HumanReply>;
}

/// Reads a line from stdin. An empty line or `exit` ends the session.
pub struct StdioInput;

#[async_trait]
impl HumanInput for StdioInput {
    async fn read(&self, prompt: &str) -> Result<HumanReply> {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            use std::io::Write;

            print!("{prompt} ");
            std::io::stdout()
                .flush()
                .map_err(|e| ParleyError::Aborted(format!("stdout unavailable: {e}")))?;

            let mut line = String::new();
            let read = std::io::stdin()
                .read_line(&mut line)
                .map_err(|e| ParleyError::Aborted(format!("stdin unavailable: {e}")))?;

            let line = line.trim();
            if read == 0 || line.is_empty() || line.eq_ignore_ascii_case("exit") {
                Ok(HumanReply::EndSession)
            } else {
                Ok(HumanReply::Text(line.to_string()))
            }
        })
        .await
        .map_err(|e| ParleyError::Aborted(format!("stdin task failed: {e}")))?
    }
}

/// Replays queued replies; once drained it ends the session.
#[derive(Default)]
pub struct QueuedInput {
    replies: Mutex<VecDeque<HumanReply>>,
}

impl QueuedInput {
    pub fn new(replies: impl IntoIterator<Item = HumanReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    /// Convenience: queue plain text replies.
    pub fn texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new(texts.into_iter().map(|t| HumanReply::Text(t.into())))
    }
}

#[async_trait]
impl HumanInput for QueuedInput {
    async fn read(&self, _prompt: &str) -> Result<HumanReply> {
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(HumanReply::EndSession))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_input_replays_then_ends_session() {
        let input = QueuedInput::texts(["looks good", "one more pass"]);
        assert_eq!(
            input.read("Reply:").await.unwrap(),
            HumanReply::Text("looks good".into())
        );
        assert_eq!(
            input.read("Reply:").await.unwrap(),
            HumanReply::Text("one more pass".into())
        );
        assert_eq!(input.read("Reply:").await.unwrap(), HumanReply::EndSession);
    }
}
