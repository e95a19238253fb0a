//! Two-agent sessions.

use futures::future::BoxFuture;
use tracing::debug;

use super::nested::NestedChat;
use super::summary::{summarize, SummaryMethod};
use super::transcript::{SessionEnd, Transcript};
use crate::agent::{Agent, StopReason, TurnOutcome};
use crate::error::{ParleyError, Result};
use crate::types::ChatMessage;

/// Message budget applied when a session does not set its own.
pub const DEFAULT_MAX_ROUNDS: usize = 10;

/// What a finished session hands back: the full history and its summary.
#[derive(Debug)]
pub struct ChatOutcome {
    pub transcript: Transcript,
    pub summary: String,
}

impl ChatOutcome {
    /// Why the session stopped.
    pub fn end(&self) -> Option<&SessionEnd> {
        self.transcript.end()
    }
}

/// A bounded conversation between an initiator and a recipient.
///
/// The initiator speaks first; turns then alternate until a termination
/// policy matches, the round limit is reached, an agent runs out of
/// automatic replies, or the human boundary ends the session.
pub struct PairChat {
    max_rounds: usize,
    summary_method: SummaryMethod,
    clear_history: bool,
    nested: Vec<NestedChat>,
}

impl Default for PairChat {
    fn default() -> Self {
        Self::new()
    }
}

impl PairChat {
    pub fn new() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            summary_method: SummaryMethod::default(),
            clear_history: false,
            nested: Vec::new(),
        }
    }

    /// Bound the number of exchanged messages.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Set how the finished session is summarized.
    pub fn with_summary_method(mut self, method: SummaryMethod) -> Self {
        self.summary_method = method;
        self
    }

    /// Discard the recipient's memory of prior sessions before starting.
    pub fn with_clear_history(mut self, clear: bool) -> Self {
        self.clear_history = clear;
        self
    }

    /// Register a nested chat that supplies replies for its trigger agent.
    pub fn with_nested(mut self, nested: NestedChat) -> Self {
        self.nested.push(nested);
        self
    }

    /// Run the session to completion.
    ///
    /// Configuration problems are rejected here, before any turn runs.
    /// Mid-session failures (inference errors) end the session with
    /// [`SessionEnd::Failed`]; the transcript stays intact and is still
    /// summarized.
    pub async fn run(
        &mut self,
        initiator: &mut Agent,
        recipient: &mut Agent,
        opening: impl Into<String>,
    ) -> Result<ChatOutcome> {
        if initiator.name() == recipient.name() {
            return Err(ParleyError::Configuration(format!(
                "participants must have distinct names, got '{}' twice",
                initiator.name()
            )));
        }
        initiator.validate()?;
        recipient.validate()?;
        let names = [initiator.name().to_string(), recipient.name().to_string()];
        for nested in &self.nested {
            nested.validate(&[names[0].as_str(), names[1].as_str()])?;
        }

        initiator.begin_session();
        recipient.begin_session();
        if self.clear_history {
            recipient.clear_memory();
        }

        let transcript = drive(
            initiator,
            recipient,
            opening.into(),
            self.max_rounds,
            &mut self.nested,
        )
        .await;

        initiator.remember(transcript.messages());
        recipient.remember(transcript.messages());

        let model = recipient.model().or_else(|| initiator.model());
        let summary = summarize(self.summary_method, &transcript, model, recipient.settings()).await;
        Ok(ChatOutcome {
            transcript,
            summary,
        })
    }
}

/// Alternate turns between two agents until the session ends.
///
/// Boxed so nested chats can re-enter the same driver; nested chats never
/// trigger further nesting, so the recursion is one level deep.
pub(crate) fn drive<'a>(
    initiator: &'a mut Agent,
    recipient: &'a mut Agent,
    opening: String,
    max_rounds: usize,
    nested: &'a mut [NestedChat],
) -> BoxFuture<'a, Transcript> {
    Box::pin(async move {
        let mut transcript = Transcript::new();
        if max_rounds == 0 {
            transcript.terminate(SessionEnd::RoundLimit);
            return transcript;
        }

        let initiator_name = initiator.name().to_string();
        let recipient_name = recipient.name().to_string();

        let mut last = ChatMessage::with_role(initiator.role(), opening)
            .from_agent(&initiator_name)
            .to_agent(&recipient_name);
        transcript.push(last.clone());

        let mut recipient_turn = true;
        loop {
            let (speaker, peer_name) = if recipient_turn {
                (&mut *recipient, initiator_name.as_str())
            } else {
                (&mut *initiator, recipient_name.as_str())
            };
            let round = transcript.round_count();

            // A terminal message beats the round limit on the same message.
            if speaker.termination().matches(&last, round) {
                transcript.terminate(SessionEnd::TerminalMessage {
                    agent: speaker.name().to_string(),
                });
                break;
            }
            if round >= max_rounds {
                transcript.terminate(SessionEnd::RoundLimit);
                break;
            }

            let speaker_name = speaker.name().to_string();
            let outcome = match nested.iter_mut().find(|n| n.trigger == speaker_name) {
                Some(chat) => {
                    debug!(trigger = %speaker_name, partner = %chat.partner.name(), "running nested chat");
                    chat.partner.begin_session();
                    let inner_opening =
                        (chat.message)(chat.partner.name(), &transcript, peer_name);
                    let mut no_nested: [NestedChat; 0] = [];
                    let inner = drive(
                        speaker,
                        &mut chat.partner,
                        inner_opening,
                        chat.max_rounds,
                        &mut no_nested,
                    )
                    .await;
                    match inner.end() {
                        // A nested session that failed mid-run fails the
                        // outer turn with it.
                        Some(SessionEnd::Failed { error }) => Err(ParleyError::Aborted(format!(
                            "nested chat with '{}' failed: {error}",
                            chat.partner.name()
                        ))),
                        _ => {
                            let model = chat.partner.model().or_else(|| speaker.model());
                            let summary =
                                summarize(chat.summary_method, &inner, model, speaker.settings())
                                    .await;
                            Ok(TurnOutcome::Reply(ChatMessage::with_role(
                                speaker.role(),
                                summary,
                            )))
                        }
                    }
                }
                None => speaker.take_turn(&last, transcript.messages(), round).await,
            };

            match outcome {
                Ok(TurnOutcome::Reply(msg)) => {
                    let msg = msg.from_agent(&speaker_name).to_agent(peer_name);
                    debug!(speaker = %speaker_name, round, "reply");
                    transcript.push(msg.clone());
                    last = msg;
                    recipient_turn = !recipient_turn;
                }
                Ok(TurnOutcome::Stop(StopReason::HumanEnded)) => {
                    transcript.terminate(SessionEnd::HumanEnded {
                        agent: speaker_name,
                    });
                    break;
                }
                Ok(TurnOutcome::Stop(StopReason::AutoRepliesExhausted)) => {
                    transcript.terminate(SessionEnd::AutoRepliesExhausted {
                        agent: speaker_name,
                    });
                    break;
                }
                Err(e) => {
                    debug!(speaker = %speaker_name, error = %e, "session failed");
                    transcript.terminate(SessionEnd::Failed {
                        error: e.to_string(),
                    });
                    break;
                }
            }
        }
        transcript
    })
}
