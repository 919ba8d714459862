//! Reasoning loop states

use crate::types::{ModelReply, ToolCall, ToolResult};

/// Where a run is in its model/tool cycle
///
/// ```text
/// AwaitingModel -> ModelResponded -> InvokingTool -> ToolResultReceived -> AwaitingModel
///                                 \-> Done
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AgentState {
    AwaitingModel,
    ModelResponded(ModelReply),
    InvokingTool(ToolCall),
    ToolResultReceived(ToolResult),
    Done(String),
}

impl AgentState {
    pub fn name(&self) -> &'static str {
        match self {
            AgentState::AwaitingModel => "awaiting_model",
            AgentState::ModelResponded(_) => "model_responded",
            AgentState::InvokingTool(_) => "invoking_tool",
            AgentState::ToolResultReceived(_) => "tool_result_received",
            AgentState::Done(_) => "done",
        }
    }
}
