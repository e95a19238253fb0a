//! Parley: multi-agent conversation orchestration.
//!
//! Wires named agents backed by a language-model endpoint into fixed
//! conversational topologies and runs short, bounded conversations:
//! a two-agent chat, a managed group chat, a nested reflection chat, or
//! a sequence of handoffs. Model inference, tool execution, and human
//! input are external collaborators behind traits.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use parley::prelude::*;
//!
//! # async fn example(model: Arc<dyn parley::model::ModelClient>) -> parley::error::Result<()> {
//! let mut assistant = Agent::new("Assistant")
//!     .with_system_prompt("You are a helpful AI assistant. Return 'TERMINATE' when the task is done.")
//!     .with_model(model);
//! let mut user = Agent::new("User")
//!     .with_termination(TerminationPolicy::contains_marker("TERMINATE"));
//!
//! let outcome = PairChat::new()
//!     .run(&mut user, &mut assistant, "What time is it in Florida?")
//!     .await?;
//! println!("{}", outcome.summary);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod human;
pub mod model;
pub mod prelude;
pub mod session;
pub mod termination;
pub mod tools;
pub mod types;
