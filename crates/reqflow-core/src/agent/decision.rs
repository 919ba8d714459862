//! Decision parsing: what did the model ask for?

use crate::types::{ModelReply, ToolCall};

/// The model's choice for one step
#[derive(Debug, Clone, PartialEq)]
pub enum ModelDecision {
    /// Final answer; the run ends
    Answer(String),
    /// Invoke one operation, then ask again
    CallTool(ToolCall),
}

/// A parsed reply plus any tool calls beyond the first
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub decision: ModelDecision,
    /// Extra calls from the same reply; only one operation runs per step
    pub dropped: Vec<ToolCall>,
}

/// Classify a model reply
///
/// A tool call takes precedence over accompanying text. Returns `None` when
/// the reply has no tool call and only whitespace text.
pub fn parse_reply(reply: ModelReply) -> Option<ParsedReply> {
    if reply.is_empty() {
        return None;
    }

    let mut calls = reply.tool_calls.into_iter();
    if let Some(first) = calls.next() {
        return Some(ParsedReply {
            decision: ModelDecision::CallTool(first),
            dropped: calls.collect(),
        });
    }

    Some(ParsedReply {
        decision: ModelDecision::Answer(reply.text),
        dropped: Vec::new(),
    })
}
