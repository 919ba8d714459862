//! Provider trait definition

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;

use crate::types::{CancellationToken, ChatMessage, ModelReply, StreamChunk, Tool};
use super::error::{ProviderError, ProviderResult};

/// Model configuration for provider requests
#[derive(Debug, Clone)]
pub struct ProviderModelConfig {
    /// Model identifier as used by the provider's API
    pub model: String,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Custom API base URL
    pub api_base: Option<String>,
}

impl ProviderModelConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            api_base: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }
}

/// Options for a chat request
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Tools the model may call
    pub tools: Option<Vec<Tool>>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }
}

/// Type alias for the streaming response
pub type StreamResponse = Pin<Box<dyn Stream<Item = ProviderResult<StreamChunk>> + Send>>;

/// Text-generation collaborator
///
/// Implementations stream chunks; callers that want a whole turn use
/// `complete`, which drains the stream into a `ModelReply`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name (e.g., "groq", "mock")
    fn name(&self) -> &str;

    /// Stream a chat completion
    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: ProviderModelConfig,
        options: ChatOptions,
        cancel_token: CancellationToken,
    ) -> ProviderResult<StreamResponse>;

    /// Run a chat completion to the end of its stream
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: ProviderModelConfig,
        options: ChatOptions,
        cancel_token: CancellationToken,
    ) -> ProviderResult<ModelReply> {
        let mut stream = self
            .stream_chat(messages, model, options, cancel_token.clone())
            .await?;

        let mut reply = ModelReply::default();
        while let Some(chunk) = stream.next().await {
            if cancel_token.is_cancelled() {
                return Err(ProviderError::Cancelled);
            }
            reply.push(chunk?);
        }
        Ok(reply)
    }
}
