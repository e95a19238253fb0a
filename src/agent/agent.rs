//! Core Agent struct and per-turn reply logic.

use std::collections::HashMap;
use std::sync::Arc;

use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::error::{ParleyError, Result};
use crate::human::{HumanInput, HumanReply};
use crate::model::{complete_with_timeout, InferenceRequest, ModelClient};
use crate::termination::TerminationPolicy;
use crate::tools::{apply_defaults, validate_arguments, Tool, ToolArguments, ToolSignature};
use crate::types::{ChatMessage, InferenceSettings, Role, ToolResultPart};

/// Whether a human is consulted before the agent's next automatic reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum HumanInputMode {
    /// Suspend for input before every reply, regardless of any model draft.
    #[strum(serialize = "ALWAYS")]
    Always,
    /// Suspend only when the draft reply would satisfy the agent's own
    /// termination policy, or when the auto-reply budget runs out.
    #[strum(serialize = "ON_TERMINATION")]
    OnTermination,
    /// Never suspend; `max_auto_replies` strictly bounds automatic replies.
    #[default]
    #[strum(serialize = "NEVER")]
    Never,
}

/// What a turn produced.
#[derive(Debug)]
pub enum TurnOutcome {
    /// A message to append to the transcript.
    Reply(ChatMessage),
    /// The agent declined to reply; the session must stop.
    Stop(StopReason),
}

/// Why an agent declined to reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The human boundary signalled "no input".
    HumanEnded,
    /// The auto-reply budget ran out with no human fallback.
    AutoRepliesExhausted,
}

enum AutoReply {
    Message(ChatMessage),
    /// An ON_TERMINATION draft that matched the agent's own policy.
    NeedsHuman,
}

/// A named conversational participant with a reply policy.
///
/// An agent may be model-backed (an assistant), human-backed (a proxy), or
/// a tool executor; the combination decides how each turn is produced. The
/// same agent value can participate in many sessions; `memory` carries its
/// view of past sessions until explicitly cleared.
pub struct Agent {
    name: String,
    system_prompt: Option<String>,
    model: Option<Arc<dyn ModelClient>>,
    human_input: Option<Arc<dyn HumanInput>>,
    human_input_mode: HumanInputMode,
    max_auto_replies: Option<usize>,
    auto_reply_count: usize,
    termination: TerminationPolicy,
    signatures: Vec<ToolSignature>,
    executors: HashMap<String, Arc<dyn Tool>>,
    settings: InferenceSettings,
    default_reply: String,
    memory: Vec<ChatMessage>,
}

impl Agent {
    /// Create a new agent with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: None,
            model: None,
            human_input: None,
            human_input_mode: HumanInputMode::default(),
            max_auto_replies: None,
            auto_reply_count: 0,
            termination: TerminationPolicy::default(),
            signatures: Vec::new(),
            executors: HashMap::new(),
            settings: InferenceSettings::default(),
            default_reply: String::new(),
            memory: Vec::new(),
        }
    }

    /// Set the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Back this agent with a model client.
    pub fn with_model(mut self, model: Arc<dyn ModelClient>) -> Self {
        self.model = Some(model);
        self
    }

    /// Attach a human input boundary.
    pub fn with_human_input(mut self, input: Arc<dyn HumanInput>) -> Self {
        self.human_input = Some(input);
        self
    }

    /// Set the human input mode.
    pub fn with_human_input_mode(mut self, mode: HumanInputMode) -> Self {
        self.human_input_mode = mode;
        self
    }

    /// Bound the number of consecutive automatic replies.
    pub fn with_max_auto_replies(mut self, max: usize) -> Self {
        self.max_auto_replies = Some(max);
        self
    }

    /// Set the termination policy.
    pub fn with_termination(mut self, policy: TerminationPolicy) -> Self {
        self.termination = policy;
        self
    }

    /// Set inference settings.
    pub fn with_settings(mut self, settings: InferenceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Text sent when the agent must reply automatically without a model.
    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role this agent's own messages carry in a transcript.
    pub fn role(&self) -> Role {
        if self.model.is_some() {
            Role::Assistant
        } else {
            Role::User
        }
    }

    pub fn termination(&self) -> &TerminationPolicy {
        &self.termination
    }

    pub fn memory(&self) -> &[ChatMessage] {
        &self.memory
    }

    pub(crate) fn model(&self) -> Option<&Arc<dyn ModelClient>> {
        self.model.as_ref()
    }

    pub(crate) fn settings(&self) -> &InferenceSettings {
        &self.settings
    }

    /// Advertise a tool signature to this agent's model.
    pub fn register_for_inference(&mut self, signature: ToolSignature) {
        self.signatures.push(signature);
    }

    /// Let this agent answer calls to the given tool.
    pub fn register_for_execution(&mut self, tool: Arc<dyn Tool>) {
        self.executors.insert(tool.name().to_string(), tool);
    }

    /// Check the agent is able to participate at all. Called at session
    /// start so misconfiguration never surfaces mid-conversation.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ParleyError::Configuration(
                "agent name must not be empty".into(),
            ));
        }
        if self.human_input_mode != HumanInputMode::Never && self.human_input.is_none() {
            return Err(ParleyError::Configuration(format!(
                "agent '{}' has human input mode {} but no human input boundary",
                self.name, self.human_input_mode
            )));
        }
        if self.max_auto_replies == Some(0) && self.human_input_mode != HumanInputMode::Always {
            return Err(ParleyError::Configuration(format!(
                "agent '{}' can never reply: max_auto_replies is 0 and human input mode is {}",
                self.name, self.human_input_mode
            )));
        }
        Ok(())
    }

    /// Reset per-session counters.
    pub(crate) fn begin_session(&mut self) {
        self.auto_reply_count = 0;
    }

    /// Forget everything from prior sessions.
    pub fn clear_memory(&mut self) {
        self.memory.clear();
    }

    /// Append a completed session's messages to this agent's memory.
    pub(crate) fn remember(&mut self, messages: &[ChatMessage]) {
        self.memory.extend_from_slice(messages);
    }

    /// Produce this agent's next turn.
    ///
    /// `incoming` is the message the agent is replying to, `visible` the
    /// session history so far, `round` the number of exchanged messages.
    /// The caller is responsible for checking the agent's termination
    /// policy against `incoming` before asking for a turn.
    pub async fn take_turn(
        &mut self,
        incoming: &ChatMessage,
        visible: &[ChatMessage],
        round: usize,
    ) -> Result<TurnOutcome> {
        if self.human_input_mode == HumanInputMode::Always {
            return self.consult_human().await;
        }

        if self.auto_replies_exhausted() {
            debug!(agent = %self.name, "auto-reply budget exhausted");
            if self.human_input_mode == HumanInputMode::OnTermination {
                return self.consult_human().await;
            }
            return Ok(TurnOutcome::Stop(StopReason::AutoRepliesExhausted));
        }

        match self.auto_reply(incoming, visible, round).await? {
            AutoReply::Message(msg) => {
                self.auto_reply_count += 1;
                Ok(TurnOutcome::Reply(msg))
            }
            AutoReply::NeedsHuman => self.consult_human().await,
        }
    }

    fn auto_replies_exhausted(&self) -> bool {
        self.max_auto_replies
            .is_some_and(|max| self.auto_reply_count >= max)
    }

    async fn auto_reply(
        &self,
        incoming: &ChatMessage,
        visible: &[ChatMessage],
        round: usize,
    ) -> Result<AutoReply> {
        // A pending tool call is answered before anything else.
        if !incoming.tool_calls().is_empty() && !self.executors.is_empty() {
            return Ok(AutoReply::Message(self.execute_tool_calls(incoming).await));
        }

        if let Some(model) = &self.model {
            let request = self.build_request(visible);
            debug!(agent = %self.name, round, "calling model");
            let reply = complete_with_timeout(model.as_ref(), &request).await?;
            let draft = if reply.tool_calls.is_empty() {
                ChatMessage::with_role(Role::Assistant, reply.text)
            } else {
                ChatMessage::tool_calls_request(reply.text, reply.tool_calls)
            };
            if self.human_input_mode == HumanInputMode::OnTermination
                && self.termination.matches(&draft, round)
            {
                return Ok(AutoReply::NeedsHuman);
            }
            return Ok(AutoReply::Message(draft));
        }

        Ok(AutoReply::Message(ChatMessage::with_role(
            self.role(),
            self.default_reply.clone(),
        )))
    }

    async fn consult_human(&mut self) -> Result<TurnOutcome> {
        let input = self.human_input.as_ref().ok_or_else(|| {
            ParleyError::Configuration(format!(
                "agent '{}' requires human input but none is configured",
                self.name
            ))
        })?;
        match input.read(&format!("Reply as {}:", self.name)).await? {
            HumanReply::Text(text) => {
                self.auto_reply_count = 0;
                Ok(TurnOutcome::Reply(ChatMessage::with_role(self.role(), text)))
            }
            HumanReply::EndSession => Ok(TurnOutcome::Stop(StopReason::HumanEnded)),
        }
    }

    async fn execute_tool_calls(&self, incoming: &ChatMessage) -> ChatMessage {
        let mut results = Vec::new();
        for call in incoming.tool_calls() {
            let result = match self.executors.get(&call.name) {
                Some(tool) => {
                    let mut args = call.arguments.clone();
                    apply_defaults(&mut args, &tool.parameters().schema);
                    match validate_arguments(&args, &tool.parameters().schema) {
                        Ok(()) => match tool.execute(&ToolArguments::new(args)).await {
                            Ok(value) => ToolResultPart {
                                tool_call_id: call.id.clone(),
                                result: value,
                                is_error: false,
                            },
                            Err(e) => {
                                warn!(tool = %call.name, error = %e, "tool execution failed");
                                error_result(&call.id, e.to_string())
                            }
                        },
                        Err(msg) => {
                            warn!(tool = %call.name, error = %msg, "tool arguments rejected");
                            error_result(
                                &call.id,
                                ParleyError::tool(&call.name, msg).to_string(),
                            )
                        }
                    }
                }
                None => {
                    warn!(tool = %call.name, "tool not found");
                    error_result(&call.id, format!("tool '{}' not found", call.name))
                }
            };
            results.push(result);
        }
        ChatMessage::tool_results(results)
    }

    fn build_request(&self, visible: &[ChatMessage]) -> InferenceRequest {
        let messages = self
            .memory
            .iter()
            .chain(visible)
            .map(|msg| self.orient(msg))
            .collect();
        InferenceRequest {
            system_prompt: self.system_prompt.clone(),
            messages,
            tools: self.signatures.clone(),
            settings: self.settings.clone(),
        }
    }

    /// Re-orient a transcript message for this agent's point of view: own
    /// messages read as assistant turns, peers' as user turns, tool
    /// results keep their role.
    fn orient(&self, msg: &ChatMessage) -> ChatMessage {
        let mut out = msg.clone();
        out.role = match msg.role {
            Role::Tool => Role::Tool,
            Role::System => Role::System,
            _ if msg.sender.as_deref() == Some(self.name.as_str()) => Role::Assistant,
            _ => Role::User,
        };
        out
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("human_input_mode", &self.human_input_mode)
            .field("max_auto_replies", &self.max_auto_replies)
            .field("tools", &self.executors.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn error_result(tool_call_id: &str, message: String) -> ToolResultPart {
    ToolResultPart {
        tool_call_id: tool_call_id.to_string(),
        result: serde_json::json!({ "error": message }),
        is_error: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScriptedClient;

    #[test]
    fn model_backed_agents_speak_as_assistant() {
        let assistant =
            Agent::new("Assistant").with_model(Arc::new(ScriptedClient::texts(["hi"])));
        assert_eq!(assistant.role(), Role::Assistant);
        assert_eq!(Agent::new("user").role(), Role::User);
    }

    #[test]
    fn zero_auto_replies_without_always_is_rejected() {
        let agent = Agent::new("user").with_max_auto_replies(0);
        let err = agent.validate().unwrap_err();
        assert!(matches!(err, ParleyError::Configuration(_)));
    }

    #[test]
    fn always_mode_without_a_boundary_is_rejected() {
        let agent = Agent::new("user").with_human_input_mode(HumanInputMode::Always);
        assert!(agent.validate().is_err());
    }

    #[test]
    fn human_input_mode_round_trips_through_strum() {
        assert_eq!(HumanInputMode::Always.to_string(), "ALWAYS");
        assert_eq!(
            "ON_TERMINATION".parse::<HumanInputMode>().unwrap(),
            HumanInputMode::OnTermination
        );
        assert_eq!("NEVER".parse::<HumanInputMode>().unwrap(), HumanInputMode::Never);
    }

    #[tokio::test]
    async fn orient_flips_peer_messages_to_user() {
        let agent = Agent::new("Writer").with_model(Arc::new(ScriptedClient::texts(["x"])));
        let own = ChatMessage::assistant("mine").from_agent("Writer");
        let peer = ChatMessage::assistant("theirs").from_agent("Critic");
        assert_eq!(agent.orient(&own).role, Role::Assistant);
        assert_eq!(agent.orient(&peer).role, Role::User);
    }
}
