//! Session summaries.

use std::sync::Arc;

use strum::{Display, EnumString};
use tracing::warn;

use super::transcript::Transcript;
use crate::model::{complete_with_timeout, InferenceRequest, ModelClient};
use crate::types::{ChatMessage, InferenceSettings, Role};

/// Prompt used by [`SummaryMethod::Reflection`].
pub const REFLECTION_PROMPT: &str =
    "Summarize the takeaway from the conversation. Do not add any introductory phrases.";

/// How a completed session is condensed into a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum SummaryMethod {
    /// Verbatim text of the last message.
    #[default]
    #[strum(serialize = "last_msg")]
    LastMessage,
    /// A separate model call over the session history.
    #[strum(serialize = "reflection_with_llm")]
    Reflection,
}

/// Condense a transcript. Reflection needs a model; without one (or when
/// the reflection call fails) the last message is used instead, since a
/// summary failure should not discard an already-completed session.
pub async fn summarize(
    method: SummaryMethod,
    transcript: &Transcript,
    model: Option<&Arc<dyn ModelClient>>,
    settings: &InferenceSettings,
) -> String {
    let last_msg = transcript.last().map(|m| m.text()).unwrap_or_default();
    match method {
        SummaryMethod::LastMessage => last_msg,
        SummaryMethod::Reflection => {
            let Some(model) = model else {
                warn!("reflection summary requested but no model is available");
                return last_msg;
            };
            let request = InferenceRequest {
                system_prompt: Some(REFLECTION_PROMPT.to_string()),
                messages: transcript
                    .messages()
                    .iter()
                    .map(|m| ChatMessage::with_role(Role::User, m.text()))
                    .collect(),
                tools: Vec::new(),
                settings: settings.clone(),
            };
            match complete_with_timeout(model.as_ref(), &request).await {
                Ok(reply) => reply.text,
                Err(e) => {
                    warn!(error = %e, "reflection summary failed");
                    last_msg
                }
            }
        }
    }
}
