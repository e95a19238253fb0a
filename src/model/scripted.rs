//! Deterministic model clients for tests and demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{InferenceRequest, ModelClient, ModelReply};
use crate::error::{ParleyError, Result};

/// Replays a fixed sequence of replies, one per call.
///
/// Exhausting the script is an inference error; a test that trips it has
/// driven more turns than it planned for.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<ModelReply>>,
}

impl ScriptedClient {
    pub fn new(replies: impl IntoIterator<Item = ModelReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    /// Convenience: a script of plain text replies.
    pub fn texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new(texts.into_iter().map(ModelReply::text))
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn complete(&self, _request: &InferenceRequest) -> Result<ModelReply> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ParleyError::inference("scripted client exhausted"))
    }
}

/// Returns the same reply on every call.
pub struct RepeatingClient {
    reply: ModelReply,
}

impl RepeatingClient {
    pub fn new(reply: ModelReply) -> Self {
        Self { reply }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ModelReply::text(text))
    }
}

#[async_trait]
impl ModelClient for RepeatingClient {
    async fn complete(&self, _request: &InferenceRequest) -> Result<ModelReply> {
        Ok(self.reply.clone())
    }
}

/// Fails every call with an inference error.
pub struct FailingClient {
    message: String,
}

impl FailingClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ModelClient for FailingClient {
    async fn complete(&self, _request: &InferenceRequest) -> Result<ModelReply> {
        Err(ParleyError::inference(self.message.clone()))
    }
}
