//! Model inference boundary.
//!
//! The session drivers talk to language models exclusively through
//! [`ModelClient`]. Network transport, authentication, and retry behavior
//! belong to the implementation; every failure reaches the session as a
//! single [`ParleyError::Inference`] kind.

pub mod scripted;

use async_trait::async_trait;

use crate::config::DEFAULT_INFERENCE_TIMEOUT;
use crate::error::{ParleyError, Result};
use crate::tools::ToolSignature;
use crate::types::{ChatMessage, InferenceSettings, ToolCall};

pub use scripted::{FailingClient, RepeatingClient, ScriptedClient};

/// One inference request: the participant's accumulated visible history
/// plus its system prompt, advertised tools, and settings.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub system_prompt: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSignature>,
    pub settings: InferenceSettings,
}

/// A model's answer: text, or a batch of tool-call requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
    /// A plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A reply requesting a single tool call.
    pub fn tool_call(call: ToolCall) -> Self {
        Self {
            text: String::new(),
            tool_calls: vec![call],
        }
    }
}

/// External collaborator producing replies for model-backed agents.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, request: &InferenceRequest) -> Result<ModelReply>;
}

/// Invoke the model, bounded by the timeout from the request settings.
pub async fn complete_with_timeout(
    client: &dyn ModelClient,
    request: &InferenceRequest,
) -> Result<ModelReply> {
    let timeout = request.settings.timeout.unwrap_or(DEFAULT_INFERENCE_TIMEOUT);
    match tokio::time::timeout(timeout, client.complete(request)).await {
        Ok(reply) => reply,
        Err(_) => Err(ParleyError::inference(format!(
            "model call timed out after {}ms",
            timeout.as_millis()
        ))),
    }
}
