//! Error types for Parley.

use thiserror::Error;

/// Primary error type for all Parley operations.
#[derive(Error, Debug)]
pub enum ParleyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown speaker: '{name}' is not an eligible participant")]
    UnknownSpeaker { name: String },

    #[error("Inference error: {message}")]
    Inference {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Tool error in '{tool_name}': {message}")]
    Tool { tool_name: String, message: String },

    #[error("Session aborted: {0}")]
    Aborted(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ParleyError {
    /// Create an inference error with a message only.
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
            source: None,
        }
    }

    /// Create an inference error wrapping an underlying cause.
    pub fn inference_with_source(
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Inference {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a tool error.
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Whether this error is reported back into the conversation as a
    /// message instead of ending the session.
    pub fn is_recoverable_in_band(&self) -> bool {
        matches!(self, Self::Tool { .. })
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ParleyError>;
