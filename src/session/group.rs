//! Group sessions with a speaker-selection policy.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::pair::{ChatOutcome, DEFAULT_MAX_ROUNDS};
use super::summary::{summarize, SummaryMethod};
use super::transcript::{SessionEnd, Transcript};
use crate::agent::{Agent, StopReason, TurnOutcome};
use crate::error::{ParleyError, Result};
use crate::model::{complete_with_timeout, InferenceRequest, ModelClient};
use crate::termination::TerminationPolicy;
use crate::types::{ChatMessage, InferenceSettings, Role};

/// Chooses the next speaker each round.
///
/// `candidates` come in table order, rotated to start after the previous
/// speaker, and exclude the previous speaker whenever at least two agents
/// are eligible. Returning a name outside `candidates` fails the round
/// with [`ParleyError::UnknownSpeaker`].
#[async_trait]
pub trait SpeakerSelector: Send + Sync {
    async fn select(&self, transcript: &Transcript, candidates: &[&str]) -> Result<String>;
}

/// Deterministic rotation over the participant order.
pub struct RoundRobin;

#[async_trait]
impl SpeakerSelector for RoundRobin {
    async fn select(&self, _transcript: &Transcript, candidates: &[&str]) -> Result<String> {
        candidates
            .first()
            .map(|name| name.to_string())
            .ok_or_else(|| ParleyError::Configuration("no eligible speakers".into()))
    }
}

/// Delegates the choice to a model call over the conversation so far.
pub struct ManagerSelect {
    model: Arc<dyn ModelClient>,
    settings: InferenceSettings,
}

impl ManagerSelect {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self {
            model,
            settings: InferenceSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: InferenceSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[async_trait]
impl SpeakerSelector for ManagerSelect {
    async fn select(&self, transcript: &Transcript, candidates: &[&str]) -> Result<String> {
        let request = InferenceRequest {
            system_prompt: Some(format!(
                "You are coordinating a conversation. Read it, then choose who \
                 speaks next from: {}. Reply with only that name.",
                candidates.join(", ")
            )),
            messages: transcript
                .messages()
                .iter()
                .map(|m| {
                    let sender = m.sender.as_deref().unwrap_or("unknown");
                    ChatMessage::with_role(Role::User, format!("{sender}: {}", m.text()))
                })
                .collect(),
            tools: Vec::new(),
            settings: self.settings.clone(),
        };
        let reply = complete_with_timeout(self.model.as_ref(), &request).await?;
        Ok(reply.text.trim().to_string())
    }
}

/// A bounded conversation among several agents, one speaker per round.
pub struct GroupChat {
    agents: Vec<Agent>,
    selector: Arc<dyn SpeakerSelector>,
    manager_termination: TerminationPolicy,
    max_rounds: usize,
    summary_method: SummaryMethod,
}

impl GroupChat {
    /// Create a group over the given agents, speaking in round-robin order
    /// unless another selector is set.
    pub fn new(agents: Vec<Agent>) -> Self {
        Self {
            agents,
            selector: Arc::new(RoundRobin),
            manager_termination: TerminationPolicy::default(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            summary_method: SummaryMethod::default(),
        }
    }

    /// Replace the speaker-selection policy.
    pub fn with_selector(mut self, selector: Arc<dyn SpeakerSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Termination policy evaluated by the manager itself, on top of the
    /// participants' own policies.
    pub fn with_manager_termination(mut self, policy: TerminationPolicy) -> Self {
        self.manager_termination = policy;
        self
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

    /// Access the participants (after a run, their memories include it).
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    fn validate(&self, initiator: &str) -> Result<()> {
        if self.agents.is_empty() {
            return Err(ParleyError::Configuration(
                "a group chat needs at least one participant".into(),
            ));
        }
        for (i, agent) in self.agents.iter().enumerate() {
            agent.validate()?;
            if self.agents[..i].iter().any(|a| a.name() == agent.name()) {
                return Err(ParleyError::Configuration(format!(
                    "duplicate participant name '{}'",
                    agent.name()
                )));
            }
        }
        if !self.agents.iter().any(|a| a.name() == initiator) {
            return Err(ParleyError::Configuration(format!(
                "initiator '{initiator}' is not a participant"
            )));
        }
        Ok(())
    }

    /// Run the session to completion, starting from the initiator's
    /// opening message.
    pub async fn run(
        &mut self,
        initiator: &str,
        opening: impl Into<String>,
    ) -> Result<ChatOutcome> {
        self.validate(initiator)?;
        for agent in &mut self.agents {
            agent.begin_session();
        }

        let mut transcript = Transcript::new();
        let opening_role = self
            .agents
            .iter()
            .find(|a| a.name() == initiator)
            .map(|a| a.role())
            .unwrap_or(Role::User);
        let mut last = ChatMessage::with_role(opening_role, opening.into()).from_agent(initiator);
        transcript.push(last.clone());

        loop {
            let round = transcript.round_count();

            // (i) terminal message, before (ii) the round limit.
            if let Some(agent) = self
                .agents
                .iter()
                .find(|a| a.termination().matches(&last, round))
            {
                transcript.terminate(SessionEnd::TerminalMessage {
                    agent: agent.name().to_string(),
                });
                break;
            }
            if self.manager_termination.matches(&last, round) {
                transcript.terminate(SessionEnd::TerminalMessage {
                    agent: "manager".to_string(),
                });
                break;
            }
            if round >= self.max_rounds {
                transcript.terminate(SessionEnd::RoundLimit);
                break;
            }

            let candidates = self.eligible_after(last.sender.as_deref());
            let chosen = match self
                .selector
                .select(&transcript, &candidates.iter().map(|s| s.as_str()).collect::<Vec<_>>())
                .await
            {
                Ok(name) => name,
                Err(e) => {
                    transcript.terminate(SessionEnd::Failed {
                        error: e.to_string(),
                    });
                    break;
                }
            };
            if !candidates.iter().any(|c| c == &chosen) {
                let e = ParleyError::UnknownSpeaker { name: chosen };
                transcript.terminate(SessionEnd::Failed {
                    error: e.to_string(),
                });
                break;
            }
            debug!(speaker = %chosen, round, "speaker selected");

            let speaker = match self.agents.iter_mut().find(|a| a.name() == chosen) {
                Some(a) => a,
                None => {
                    let e = ParleyError::UnknownSpeaker { name: chosen };
                    transcript.terminate(SessionEnd::Failed {
                        error: e.to_string(),
                    });
                    break;
                }
            };
            match speaker.take_turn(&last, transcript.messages(), round).await {
                Ok(TurnOutcome::Reply(msg)) => {
                    let msg = msg.from_agent(speaker.name());
                    transcript.push(msg.clone());
                    last = msg;
                }
                Ok(TurnOutcome::Stop(StopReason::HumanEnded)) => {
                    transcript.terminate(SessionEnd::HumanEnded {
                        agent: speaker.name().to_string(),
                    });
                    break;
                }
                Ok(TurnOutcome::Stop(StopReason::AutoRepliesExhausted)) => {
                    transcript.terminate(SessionEnd::AutoRepliesExhausted {
                        agent: speaker.name().to_string(),
                    });
                    break;
                }
                Err(e) => {
                    transcript.terminate(SessionEnd::Failed {
                        error: e.to_string(),
                    });
                    break;
                }
            }
        }

        for agent in &mut self.agents {
            agent.remember(transcript.messages());
        }

        let model_agent = self.agents.iter().find(|a| a.model().is_some());
        let model = model_agent.and_then(|a| a.model());
        let settings = model_agent
            .map(|a| a.settings().clone())
            .unwrap_or_default();
        let summary = summarize(self.summary_method, &transcript, model, &settings).await;
        Ok(ChatOutcome {
            transcript,
            summary,
        })
    }

    /// Participants in table order rotated to start after the previous
    /// speaker, excluding the previous speaker while at least two agents
    /// are eligible.
    fn eligible_after(&self, previous: Option<&str>) -> Vec<String> {
        let names: Vec<String> = self.agents.iter().map(|a| a.name().to_string()).collect();
        if names.len() < 2 {
            return names;
        }
        let start = previous
            .and_then(|p| names.iter().position(|n| n == p))
            .map(|i| i + 1)
            .unwrap_or(0);
        (0..names.len())
            .map(|offset| names[(start + offset) % names.len()].clone())
            .filter(|n| Some(n.as_str()) != previous)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScriptedClient;

    fn named_agents(names: &[&str]) -> Vec<Agent> {
        names.iter().map(|n| Agent::new(*n)).collect()
    }

    #[test]
    fn eligible_after_rotates_and_excludes_previous() {
        let group = GroupChat::new(named_agents(&["A", "B", "C"]));
        assert_eq!(group.eligible_after(Some("A")), vec!["B", "C"]);
        assert_eq!(group.eligible_after(Some("B")), vec!["C", "A"]);
        assert_eq!(group.eligible_after(Some("C")), vec!["A", "B"]);
    }

    #[test]
    fn single_agent_group_degenerates_to_direct_reply() {
        let group = GroupChat::new(named_agents(&["A"]));
        assert_eq!(group.eligible_after(Some("A")), vec!["A"]);
    }

    #[test]
    fn unknown_previous_speaker_starts_from_the_top() {
        let group = GroupChat::new(named_agents(&["A", "B"]));
        assert_eq!(group.eligible_after(None), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn round_robin_picks_first_candidate() {
        let choice = RoundRobin
            .select(&Transcript::new(), &["B", "C"])
            .await
            .unwrap();
        assert_eq!(choice, "B");
    }

    #[tokio::test]
    async fn manager_select_trims_the_model_reply() {
        let selector = ManagerSelect::new(Arc::new(ScriptedClient::texts(["  Engineer\n"])));
        let choice = selector
            .select(&Transcript::new(), &["Engineer", "Critic"])
            .await
            .unwrap();
        assert_eq!(choice, "Engineer");
    }
}
