//! Register a tool with the agent that calls it and the agent that runs it.

use std::sync::Arc;

use super::tool::Tool;
use crate::agent::Agent;

/// Register `tool` for calling and execution in one step.
///
/// The caller advertises the tool's signature to its model; the executor
/// answers the resulting tool calls. The two may be the same agent.
pub fn register_tool(tool: Arc<dyn Tool>, caller: &mut Agent, executor: &mut Agent) {
    caller.register_for_inference(tool.signature());
    executor.register_for_execution(tool);
}
