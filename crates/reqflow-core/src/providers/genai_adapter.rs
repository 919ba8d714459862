//! Adapter between reqflow types and genai types
//!
//! Auth never falls back to genai's environment lookup: the key resolved at
//! startup travels in `ProviderModelConfig` and is handed to genai through an
//! `AuthResolver`.

use std::future::Future;
use std::pin::Pin;

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatStreamEvent,
    MessageContent as GenaiContent, Tool as GenaiTool, ToolCall as GenaiToolCall,
    ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};
use serde_json::json;

use crate::types::{ChatMessage, ContentPart, MessageContent, MessageRole, StreamChunk, Tool, ToolCall};

use super::error::ProviderError;
use super::traits::{ChatOptions, ProviderModelConfig};

// ============================================================================
// Message Conversion: reqflow -> genai
// ============================================================================

/// Convert one conversation entry to genai's representation
///
/// Tool traffic maps onto genai's native tool messages so the model sees its
/// own calls and their results in the shape the provider API expects.
pub fn to_genai_message(msg: ChatMessage) -> GenaiMessage {
    let parts = match msg.content {
        MessageContent::Text(text) => return text_message(msg.role, text),
        MessageContent::Parts(parts) => parts,
    };

    let mut calls = Vec::new();
    let mut texts = Vec::new();
    for part in parts {
        match part {
            ContentPart::Text { text } => texts.push(text),
            ContentPart::ToolUse { id, name, input } => calls.push(ToolCall::new(id, name, input)),
            ContentPart::ToolResult { tool_use_id, content, .. } => {
                return GenaiMessage::from(GenaiToolResponse::new(tool_use_id, content));
            }
        }
    }

    if !calls.is_empty() {
        let genai_calls: Option<Vec<GenaiToolCall>> = calls.iter().map(to_genai_tool_call).collect();
        if let Some(genai_calls) = genai_calls {
            return GenaiMessage::from(genai_calls);
        }
        // Fall back to a textual trace of the request
        texts.extend(
            calls
                .iter()
                .map(|c| format!("[Called tool {} with {}]", c.name, c.input)),
        );
    }

    text_message(msg.role, texts.join("\n"))
}

fn text_message(role: MessageRole, text: String) -> GenaiMessage {
    let content = GenaiContent::from(text);
    match role {
        MessageRole::System => GenaiMessage::system(content),
        MessageRole::User | MessageRole::Tool => GenaiMessage::user(content),
        MessageRole::Assistant => GenaiMessage::assistant(content),
    }
}

/// Build genai's tool call through serde, leaving provider-specific extras unset
fn to_genai_tool_call(call: &ToolCall) -> Option<GenaiToolCall> {
    serde_json::from_value(json!({
        "call_id": call.id,
        "fn_name": call.name,
        "fn_arguments": call.input,
    }))
    .ok()
}

pub fn to_genai_messages(messages: Vec<ChatMessage>) -> Vec<GenaiMessage> {
    messages.into_iter().map(to_genai_message).collect()
}

// ============================================================================
// Tool and option conversion
// ============================================================================

pub fn to_genai_tool(tool: Tool) -> GenaiTool {
    let mut genai_tool = GenaiTool::new(&tool.name).with_description(&tool.description);

    if let Some(schema) = tool.input_schema {
        genai_tool = genai_tool.with_schema(schema);
    }

    genai_tool
}

pub fn to_genai_tools(tools: Vec<Tool>) -> Vec<GenaiTool> {
    tools.into_iter().map(to_genai_tool).collect()
}

pub fn to_genai_options(options: &ChatOptions) -> GenaiOptions {
    let mut genai_opts = GenaiOptions::default();

    if let Some(temp) = options.temperature {
        genai_opts = genai_opts.with_temperature(temp as f64);
    }

    if let Some(max_tokens) = options.max_tokens {
        genai_opts = genai_opts.with_max_tokens(max_tokens);
    }

    // Tool calls only surface at stream end when captured
    genai_opts.with_capture_tool_calls(true)
}

// ============================================================================
// Response Conversion: genai -> reqflow
// ============================================================================

pub fn from_genai_tool_call(tc: &GenaiToolCall) -> ToolCall {
    ToolCall {
        id: tc.call_id.clone(),
        name: tc.fn_name.clone(),
        input: tc.fn_arguments.clone(),
    }
}

/// Convert a genai stream event into zero or more chunks
///
/// Partial tool-call chunks are ignored; the complete calls are emitted from
/// the captured set when the stream ends.
pub fn from_genai_event(event: ChatStreamEvent) -> Vec<Result<StreamChunk, ProviderError>> {
    match event {
        ChatStreamEvent::Chunk(chunk) => vec![Ok(StreamChunk::text(chunk.content))],
        ChatStreamEvent::End(end) => match end.captured_tool_calls() {
            Some(tool_calls) => tool_calls
                .iter()
                .map(|tc| Ok(StreamChunk::tool_call(from_genai_tool_call(tc))))
                .collect(),
            None => Vec::new(),
        },
        ChatStreamEvent::Start
        | ChatStreamEvent::ToolCallChunk(_)
        | ChatStreamEvent::ReasoningChunk(_)
        | ChatStreamEvent::ThoughtSignatureChunk(_) => Vec::new(),
    }
}

// ============================================================================
// Client creation
// ============================================================================

/// Connection parameters for one genai client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Provider identifier (e.g., "groq", "openai", "openrouter")
    pub provider: String,
    pub api_key: Option<String>,
    pub api_base: Option<String>,
}

/// Adapter genai should use for a provider id, when it is not left to inference
pub fn adapter_kind_for(provider: &str) -> Option<AdapterKind> {
    let kind = match provider.to_lowercase().as_str() {
        "openai" | "openrouter" | "mistral" | "azure" => AdapterKind::OpenAI,
        "anthropic" => AdapterKind::Anthropic,
        "gemini" | "google" => AdapterKind::Gemini,
        "ollama" => AdapterKind::Ollama,
        "groq" => AdapterKind::Groq,
        "xai" => AdapterKind::Xai,
        "deepseek" => AdapterKind::DeepSeek,
        "cohere" => AdapterKind::Cohere,
        "fireworks" => AdapterKind::Fireworks,
        "together" => AdapterKind::Together,
        _ => return None,
    };
    Some(kind)
}

/// Fixed endpoints for OpenAI-compatible providers genai does not know natively
fn compat_endpoint(provider: &str) -> Option<&'static str> {
    match provider {
        "openrouter" => Some("https://openrouter.ai/api/v1/"),
        "mistral" => Some("https://api.mistral.ai/v1/"),
        _ => None,
    }
}

/// Create a genai Client pinned to one provider, key and endpoint
pub fn create_client(config: &ClientConfig) -> Client {
    let explicit_key = config.api_key.clone();

    let auth_resolver = AuthResolver::from_resolver_async_fn(
        move |_model_iden: ModelIden| -> Pin<Box<dyn Future<Output = genai::resolver::Result<Option<AuthData>>> + Send>> {
            let key = explicit_key.clone();
            Box::pin(async move { Ok(key.map(AuthData::from_single)) })
        },
    );

    let provider = config.provider.to_lowercase();
    let api_base = config.api_base.clone();

    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let Some(adapter_kind) = adapter_kind_for(&provider) else {
                return Ok(target);
            };

            let endpoint = match (&api_base, compat_endpoint(&provider)) {
                (Some(base), _) => Endpoint::from_owned(base.clone()),
                (None, Some(fixed)) => Endpoint::from_static(fixed),
                (None, None) => target.endpoint,
            };
            let model = ModelIden::new(adapter_kind, target.model.model_name.clone());

            Ok(ServiceTarget {
                endpoint,
                auth: target.auth,
                model,
            })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}

/// Providers that work without an API key
pub fn requires_api_key(provider: &str) -> bool {
    !matches!(provider.to_lowercase().as_str(), "ollama" | "mock")
}

#[cfg(test)]
mod tests {
    use super::*;
    use genai::chat::ChatRole as GenaiRole;

    #[test]
    fn test_text_message_roles() {
        assert!(matches!(to_genai_message(ChatMessage::user("todo app")).role, GenaiRole::User));
        assert!(matches!(to_genai_message(ChatMessage::assistant("done")).role, GenaiRole::Assistant));
        assert!(matches!(to_genai_message(ChatMessage::system("be brief")).role, GenaiRole::System));
    }

    #[test]
    fn test_tool_result_becomes_tool_message() {
        let result = crate::types::ToolResult::success("call_1", "{\"functional\":[]}");
        let msg = to_genai_message(ChatMessage::tool_result(&result));
        assert!(matches!(msg.role, GenaiRole::Tool));
    }

    #[test]
    fn test_tool_call_message_is_assistant() {
        let call = ToolCall::new("call_1", "requirements", json!({"project_description": "todo"}));
        let msg = to_genai_message(ChatMessage::assistant_tool_call(&call));
        assert!(matches!(msg.role, GenaiRole::Assistant));
    }

    #[test]
    fn test_tool_conversion() {
        let tool = Tool::new("generate_software_requirements", "Extract requirements")
            .with_schema(json!({"type": "object"}));
        let genai_tool = to_genai_tool(tool);
        assert_eq!(genai_tool.name, "generate_software_requirements");
    }

    #[test]
    fn test_adapter_kind_mapping() {
        assert!(matches!(adapter_kind_for("groq"), Some(AdapterKind::Groq)));
        assert!(matches!(adapter_kind_for("OpenRouter"), Some(AdapterKind::OpenAI)));
        assert!(adapter_kind_for("unknown_provider").is_none());
        assert!(requires_api_key("groq"));
        assert!(!requires_api_key("ollama"));
    }
}
