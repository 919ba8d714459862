//! Conversation message types

use serde::{Deserialize, Serialize};

use super::tool::{ToolCall, ToolResult};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    /// Output of a tool invocation fed back to the model
    Tool,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

/// A single entry of the conversation sent to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender
    pub role: MessageRole,
    /// The content of the message (string or structured parts)
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Assistant message recording the tool call the model asked for
    pub fn assistant_tool_call(call: &ToolCall) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Parts(vec![ContentPart::tool_use(
                call.id.clone(),
                call.name.clone(),
                call.input.clone(),
            )]),
        }
    }

    /// Tool-role message carrying the outcome of an invocation
    pub fn tool_result(result: &ToolResult) -> Self {
        Self {
            role: MessageRole::Tool,
            content: MessageContent::Parts(vec![ContentPart::ToolResult {
                tool_use_id: result.call_id.clone(),
                content: result.content.clone(),
                is_error: result.is_error,
            }]),
        }
    }

    /// Get the text content if this is a simple text message
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(s) => Some(s),
            MessageContent::Parts(_) => None,
        }
    }

    /// Tool calls carried by this message, if any
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        match &self.content {
            MessageContent::Text(_) => Vec::new(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::ToolUse { id, name, input } => {
                        Some(ToolCall::new(id.clone(), name.clone(), input.clone()))
                    }
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Message content - either simple text or structured parts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content
    Text(String),
    /// Structured content (tool use / tool result)
    Parts(Vec<ContentPart>),
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

/// Structured content part for tool traffic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    /// The assistant asking for a tool
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    /// What the tool returned
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

impl ContentPart {
    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: serde_json::Value) -> Self {
        ContentPart::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_message_creation() {
        let sys = ChatMessage::system("You are helpful");
        assert_eq!(sys.role, MessageRole::System);
        assert_eq!(sys.text(), Some("You are helpful"));

        let user = ChatMessage::user("todo app");
        assert_eq!(user.role, MessageRole::User);
        assert!(user.tool_calls().is_empty());
    }

    #[test]
    fn test_tool_call_round_trip_through_message() {
        let call = ToolCall::new("call_1", "requirements", json!({"project_description": "todo app"}));
        let msg = ChatMessage::assistant_tool_call(&call);

        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.text(), None);
        let calls = msg.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "requirements");
    }

    #[test]
    fn test_tool_result_message_serialization() {
        let msg = ChatMessage::tool_result(&ToolResult::error("call_1", "boom"));
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"tool\""));
        assert!(json.contains("\"type\":\"tool_result\""));
        assert!(json.contains("\"is_error\":true"));
    }
}
