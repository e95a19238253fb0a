//! Core types shared across the crate.

pub mod message;
pub mod settings;

pub use message::{ChatMessage, ContentPart, Role, ToolCall, ToolResultPart};
pub use settings::InferenceSettings;
