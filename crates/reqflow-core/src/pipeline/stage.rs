//! One model role inside the pipeline

use std::sync::Arc;
use std::time::Duration;

use crate::config::ModelSettings;
use crate::logging::Logger;
use crate::providers::{complete_within, create_provider, ChatOptions, Provider, ProviderModelConfig};
use crate::types::ChatMessage;

use super::error::{PipelineError, PipelineResult, Stage};

/// Provider, model and options for a single generation stage
#[derive(Clone)]
pub struct StageModel {
    pub provider: Arc<dyn Provider>,
    pub model: ProviderModelConfig,
    pub options: ChatOptions,
}

impl StageModel {
    pub fn new(provider: Arc<dyn Provider>, model: ProviderModelConfig) -> Self {
        Self {
            provider,
            model,
            options: ChatOptions::new(),
        }
    }

    pub fn from_settings(settings: &ModelSettings, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider: create_provider(&settings.provider, logger),
            model: settings.config.clone(),
            options: settings.options(),
        }
    }

    /// Send `prompt` as a single user message; returns the trimmed reply text
    pub(crate) async fn generate(&self, stage: Stage, prompt: String, timeout: Duration) -> PipelineResult<String> {
        let reply = complete_within(
            self.provider.as_ref(),
            vec![ChatMessage::user(prompt)],
            self.model.clone(),
            self.options.clone(),
            timeout,
        )
        .await
        .map_err(|source| PipelineError::GenerationFailed { stage, source })?;

        let text = reply.text.trim();
        if text.is_empty() {
            return Err(PipelineError::EmptyResponse { stage });
        }
        Ok(text.to_string())
    }
}

impl std::fmt::Debug for StageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageModel")
            .field("provider", &self.provider.name())
            .field("model", &self.model.model)
            .finish()
    }
}
