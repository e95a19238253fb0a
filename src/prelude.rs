//! Convenience re-exports for common use.

pub use crate::agent::{Agent, HumanInputMode, StopReason, TurnOutcome};
pub use crate::config::ParleyConfig;
pub use crate::error::{ParleyError, Result};
pub use crate::human::{HumanInput, HumanReply, QueuedInput, StdioInput};
pub use crate::model::{InferenceRequest, ModelClient, ModelReply, ScriptedClient};
pub use crate::session::{
    run_chat_sequence, ChatOutcome, ChatSpec, GroupChat, ManagerSelect, NestedChat, PairChat,
    RoundRobin, SessionEnd, SessionSummary, SpeakerSelector, SummaryMethod, Transcript,
};
pub use crate::termination::TerminationPolicy;
pub use crate::tools::{register_tool, FnTool, Tool, ToolArguments, ToolParameters};
pub use crate::types::{ChatMessage, ContentPart, InferenceSettings, Role, ToolCall};
