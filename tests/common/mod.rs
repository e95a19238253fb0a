//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use parley::error::Result;
use parley::model::{InferenceRequest, ModelClient, ModelReply, ScriptedClient};
use parley::prelude::*;

/// Records every request it sees, then delegates to a scripted reply list.
pub struct RecordingClient {
    requests: Mutex<Vec<InferenceRequest>>,
    inner: ScriptedClient,
}

impl RecordingClient {
    pub fn new(replies: impl IntoIterator<Item = ModelReply>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            inner: ScriptedClient::new(replies),
        }
    }

    pub fn texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new(texts.into_iter().map(ModelReply::text))
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for RecordingClient {
    async fn complete(&self, request: &InferenceRequest) -> Result<ModelReply> {
        self.requests.lock().unwrap().push(request.clone());
        self.inner.complete(request).await
    }
}

/// A model-backed agent replaying the given replies in order.
pub fn assistant<S: Into<String>>(name: &str, texts: impl IntoIterator<Item = S>) -> Agent {
    Agent::new(name).with_model(Arc::new(ScriptedClient::texts(texts)))
}

/// A plain user proxy terminating on the conventional marker.
pub fn terminating_proxy(name: &str) -> Agent {
    Agent::new(name)
        .with_termination(TerminationPolicy::contains_marker("TERMINATE"))
        .with_max_auto_replies(10)
}
