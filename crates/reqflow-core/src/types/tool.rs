//! Tool/function calling types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool signature offered to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// Tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier correlating the call with its result
    pub id: String,
    /// Name of the operation being called
    pub name: String,
    /// Input arguments for the operation
    pub input: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// Outcome of a tool call as it is written back into the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this is responding to
    #[serde(rename = "callId")]
    pub call_id: String,
    /// The result content (payload or error description)
    pub content: String,
    /// Whether this result represents an error
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: error.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_creation() {
        let tool = Tool::new("generate_software_requirements", "Extract requirements")
            .with_schema(json!({
                "type": "object",
                "properties": {
                    "project_description": { "type": "string" }
                },
                "required": ["project_description"]
            }));

        assert_eq!(tool.name, "generate_software_requirements");
        assert!(tool.input_schema.is_some());
    }

    #[test]
    fn test_tool_result() {
        assert!(!ToolResult::success("call_123", "{}").is_error);
        assert!(ToolResult::error("call_456", "unknown operation").is_error);
    }
}
