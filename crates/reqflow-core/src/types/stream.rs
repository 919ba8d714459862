//! Streaming response types

use serde::{Deserialize, Serialize};
use super::tool::ToolCall;

/// Streaming chunk from a model response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamChunk {
    /// Text content chunk
    Text {
        text: String,
    },
    /// Complete tool call
    ToolCall {
        #[serde(rename = "toolCall")]
        tool_call: ToolCall,
    },
}

impl StreamChunk {
    pub fn text(text: impl Into<String>) -> Self {
        StreamChunk::Text { text: text.into() }
    }

    pub fn tool_call(tool_call: ToolCall) -> Self {
        StreamChunk::ToolCall { tool_call }
    }
}

/// A whole model turn, assembled from its stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
    /// Concatenated text chunks
    pub text: String,
    /// Tool calls in the order they were emitted
    pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_call(call: ToolCall) -> Self {
        Self {
            text: String::new(),
            tool_calls: vec![call],
        }
    }

    /// Fold one chunk into the reply
    pub fn push(&mut self, chunk: StreamChunk) {
        match chunk {
            StreamChunk::Text { text } => self.text.push_str(&text),
            StreamChunk::ToolCall { tool_call } => self.tool_calls.push(tool_call),
        }
    }

    /// True when the model produced neither text nor a tool call
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.tool_calls.is_empty()
    }
}
