//! Mock provider for testing
//!
//! Deterministic replies without network access. Scripted mode hands out one
//! prepared `ModelReply` per request, which is how agent and pipeline tests
//! drive multi-step conversations.

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use super::error::{ProviderError, ProviderResult};
use super::traits::{ChatOptions, Provider, ProviderModelConfig, StreamResponse};
use crate::logging::Logger;
use crate::types::{CancellationToken, ChatMessage, MessageContent, MessageRole, ModelReply, StreamChunk};

/// Mock response mode
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Echo back the last user message
    Echo,
    /// Return the same text for every request
    Fixed(String),
    /// Return the queued replies in order; fails once exhausted
    Script(Vec<ModelReply>),
    /// Fail every request
    Error(String),
    /// Never answer (for timeout tests)
    Hang,
}

/// What the mock saw for one request
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub tool_names: Vec<String>,
}

/// Mock text-generation provider
pub struct MockProvider {
    mode: MockMode,
    script: Mutex<VecDeque<ModelReply>>,
    requests: Mutex<Vec<MockRequest>>,
    logger: Arc<dyn Logger>,
}

impl MockProvider {
    pub fn new(mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        let script = match &mode {
            MockMode::Script(replies) => replies.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Self {
            mode,
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
            logger,
        }
    }

    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Echo, logger)
    }

    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Fixed(response.into()), logger)
    }

    pub fn scripted(replies: Vec<ModelReply>, logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Script(replies), logger)
    }

    pub fn error(message: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Error(message.into()), logger)
    }

    pub fn hanging(logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Hang, logger)
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    fn last_user_message(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .rev()
            .filter(|m| m.role == MessageRole::User)
            .find_map(|m| match &m.content {
                MessageContent::Text(text) if !text.is_empty() => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "Hello from MockProvider!".to_string())
    }

    fn reply_chunks(reply: ModelReply) -> Vec<ProviderResult<StreamChunk>> {
        let mut chunks = Vec::new();
        if !reply.text.is_empty() {
            chunks.push(Ok(StreamChunk::text(reply.text)));
        }
        chunks.extend(reply.tool_calls.into_iter().map(|c| Ok(StreamChunk::tool_call(c))));
        chunks
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: ProviderModelConfig,
        options: ChatOptions,
        cancel_token: CancellationToken,
    ) -> ProviderResult<StreamResponse> {
        self.requests.lock().push(MockRequest {
            messages: messages.clone(),
            model: model.model.clone(),
            tool_names: options
                .tools
                .as_ref()
                .map(|tools| tools.iter().map(|t| t.name.clone()).collect())
                .unwrap_or_default(),
        });

        let chunks = match &self.mode {
            MockMode::Echo => {
                let text = format!("Echo: {}", Self::last_user_message(&messages));
                self.logger.debug(&format!("MockProvider: echo '{}'", text));
                Self::reply_chunks(ModelReply::text(text))
            }
            MockMode::Fixed(response) => Self::reply_chunks(ModelReply::text(response.clone())),
            MockMode::Script(_) => {
                let next = self.script.lock().pop_front();
                match next {
                    Some(reply) => {
                        self.logger.debug(&format!(
                            "MockProvider: scripted reply ({} tool calls)",
                            reply.tool_calls.len()
                        ));
                        Self::reply_chunks(reply)
                    }
                    None => return Err(ProviderError::Other("Mock script exhausted".to_string())),
                }
            }
            MockMode::Error(message) => {
                return Err(ProviderError::Other(format!("Mock error: {}", message)));
            }
            MockMode::Hang => {
                cancel_token.cancelled().await;
                return Err(ProviderError::Cancelled);
            }
        };

        Ok(Box::pin(stream::iter(chunks)))
    }
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider").field("mode", &self.mode).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::types::ToolCall;
    use serde_json::json;

    fn test_logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    async fn complete(provider: &MockProvider, content: &str) -> ProviderResult<ModelReply> {
        provider
            .complete(
                vec![ChatMessage::user(content)],
                ProviderModelConfig::new("mock-model"),
                ChatOptions::default(),
                CancellationToken::new(),
            )
            .await
    }

    #[tokio::test]
    async fn test_echo_mode() {
        let provider = MockProvider::echo(test_logger());
        let reply = complete(&provider, "Hello, world!").await.unwrap();
        assert_eq!(reply.text, "Echo: Hello, world!");
    }

    #[tokio::test]
    async fn test_script_mode_in_order_then_exhausted() {
        let provider = MockProvider::scripted(
            vec![
                ModelReply::tool_call(ToolCall::new("c1", "requirements", json!({}))),
                ModelReply::text("final"),
            ],
            test_logger(),
        );

        assert_eq!(complete(&provider, "a").await.unwrap().tool_calls.len(), 1);
        assert_eq!(complete(&provider, "b").await.unwrap().text, "final");
        assert!(complete(&provider, "c").await.is_err());
        assert_eq!(provider.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_error_mode() {
        let provider = MockProvider::error("boom", test_logger());
        let err = complete(&provider, "a").await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_records_tool_names() {
        let provider = MockProvider::fixed("ok", test_logger());
        provider
            .complete(
                vec![ChatMessage::user("hi")],
                ProviderModelConfig::new("mock-model"),
                ChatOptions::new().with_tools(vec![crate::types::Tool::new("echo", "Echo")]),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests[0].tool_names, vec!["echo".to_string()]);
        assert_eq!(requests[0].model, "mock-model");
    }
}
