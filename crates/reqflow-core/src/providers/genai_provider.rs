//! GenaiProvider - provider backed by the genai crate
//!
//! Handles every genai-native provider (Groq, OpenAI, Anthropic, ...) plus
//! OpenAI-compatible endpoints via a custom service target.

use async_trait::async_trait;
use futures::{stream, StreamExt};
use std::sync::Arc;

use genai::chat::ChatRequest;

use crate::logging::Logger;
use crate::types::{CancellationToken, ChatMessage};

use super::error::{ProviderError, ProviderResult};
use super::genai_adapter::{
    adapter_kind_for, create_client, from_genai_event, requires_api_key, to_genai_messages,
    to_genai_options, to_genai_tools, ClientConfig,
};
use super::traits::{ChatOptions, Provider, ProviderModelConfig, StreamResponse};

/// Provider talking to a remote LLM API through genai
pub struct GenaiProvider {
    provider_id: String,
    logger: Arc<dyn Logger>,
}

impl GenaiProvider {
    pub fn new(provider_id: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider_id: provider_id.into(),
            logger,
        }
    }

    /// Whether genai can route this provider id
    pub fn supports(provider_id: &str) -> bool {
        adapter_kind_for(provider_id).is_some()
    }

    /// Model id as the provider API expects it
    ///
    /// A leading `<provider_id>/` is dropped; any other namespace
    /// ("meta-llama/llama-4-scout-17b-16e-instruct") is part of the id.
    pub fn extract_model_name<'a>(provider_id: &str, model: &'a str) -> &'a str {
        match model.split_once('/') {
            Some((prefix, name)) if prefix.eq_ignore_ascii_case(provider_id) => name,
            _ => model,
        }
    }
}

#[async_trait]
impl Provider for GenaiProvider {
    fn name(&self) -> &str {
        &self.provider_id
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model_config: ProviderModelConfig,
        options: ChatOptions,
        cancel_token: CancellationToken,
    ) -> ProviderResult<StreamResponse> {
        if model_config.api_key.is_none() && requires_api_key(&self.provider_id) {
            return Err(ProviderError::MissingApiKey {
                provider: self.provider_id.clone(),
            });
        }

        let model_name = Self::extract_model_name(&self.provider_id, &model_config.model).to_string();
        self.logger.info(&format!(
            "[GenaiProvider] stream_chat: provider={}, model={}, messages={}",
            self.provider_id,
            model_name,
            messages.len()
        ));

        let client = create_client(&ClientConfig {
            provider: self.provider_id.clone(),
            api_key: model_config.api_key.clone(),
            api_base: model_config.api_base.clone(),
        });

        let mut chat_req = ChatRequest::new(to_genai_messages(messages));
        if let Some(tools) = &options.tools {
            if !tools.is_empty() {
                chat_req = chat_req.with_tools(to_genai_tools(tools.clone()));
            }
        }
        let genai_options = to_genai_options(&options);

        let chat_stream = client
            .exec_chat_stream(&model_name, chat_req, Some(&genai_options))
            .await
            .map_err(|e| ProviderError::api_error(self.provider_id.clone(), 500, e.to_string()))?;

        let logger = Arc::clone(&self.logger);
        let provider_id = self.provider_id.clone();

        let chunks = chat_stream
            .stream
            .map(move |result| {
                if cancel_token.is_cancelled() {
                    logger.info("[GenaiProvider] Stream cancelled");
                    return vec![Err(ProviderError::Cancelled)];
                }
                match result {
                    Ok(event) => from_genai_event(event),
                    Err(e) => {
                        logger.error(&format!("[GenaiProvider] Stream error: {}", e));
                        vec![Err(ProviderError::api_error(provider_id.clone(), 500, e.to_string()))]
                    }
                }
            })
            .flat_map(stream::iter);

        Ok(Box::pin(chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    #[test]
    fn test_extract_model_name() {
        assert_eq!(GenaiProvider::extract_model_name("groq", "groq/llama3-70b-8192"), "llama3-70b-8192");
        assert_eq!(GenaiProvider::extract_model_name("groq", "gemma2-9b-it"), "gemma2-9b-it");
    }

    #[test]
    fn test_namespaced_model_id_is_sent_whole() {
        assert_eq!(
            GenaiProvider::extract_model_name("groq", "meta-llama/llama-4-scout-17b-16e-instruct"),
            "meta-llama/llama-4-scout-17b-16e-instruct"
        );
        assert_eq!(
            GenaiProvider::extract_model_name("openrouter", "anthropic/claude-3.5-sonnet"),
            "anthropic/claude-3.5-sonnet"
        );
    }

    #[test]
    fn test_supports() {
        assert!(GenaiProvider::supports("groq"));
        assert!(GenaiProvider::supports("openrouter"));
        assert!(!GenaiProvider::supports("unknown_provider"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let provider = GenaiProvider::new("groq", Arc::new(NoOpLogger));
        let result = provider
            .stream_chat(
                vec![ChatMessage::user("hello")],
                ProviderModelConfig::new("llama3-70b-8192"),
                ChatOptions::new(),
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(ProviderError::MissingApiKey { .. })));
    }
}
