//! Conversational agents: named participants with a reply policy.

pub mod agent;

pub use agent::{Agent, HumanInputMode, StopReason, TurnOutcome};
