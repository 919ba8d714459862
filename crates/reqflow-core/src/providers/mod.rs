//! Text-generation providers
//!
//! `GenaiProvider` covers every real LLM API through the `genai` crate;
//! `MockProvider` replays scripted replies for tests.

mod traits;
mod error;
mod genai_adapter;
mod genai_provider;
mod mock;

pub use traits::{ChatOptions, Provider, ProviderModelConfig, StreamResponse};
pub use error::{ProviderError, ProviderResult};
pub use genai_adapter::requires_api_key;
pub use genai_provider::GenaiProvider;
pub use mock::{MockMode, MockProvider, MockRequest};

use std::sync::Arc;
use std::time::Duration;

use crate::logging::Logger;
use crate::types::{CancellationToken, ChatMessage, ModelReply};

/// Create a provider for the given provider ID
///
/// `mock` yields an echoing `MockProvider`; everything else goes through genai,
/// which treats unknown ids as OpenAI-compatible.
pub fn create_provider(provider_id: &str, logger: Arc<dyn Logger>) -> Arc<dyn Provider> {
    match provider_id.to_lowercase().as_str() {
        "mock" => Arc::new(MockProvider::echo(logger)),
        _ => Arc::new(GenaiProvider::new(provider_id, logger)),
    }
}

/// Run `Provider::complete` under a deadline
///
/// On expiry the request's cancellation token is tripped and
/// `ProviderError::Timeout` is returned.
pub async fn complete_within(
    provider: &dyn Provider,
    messages: Vec<ChatMessage>,
    model: ProviderModelConfig,
    options: ChatOptions,
    timeout: Duration,
) -> ProviderResult<ModelReply> {
    let cancel = CancellationToken::new();
    match tokio::time::timeout(timeout, provider.complete(messages, model, options, cancel.clone())).await {
        Ok(result) => result,
        Err(_) => {
            cancel.cancel();
            Err(ProviderError::Timeout(timeout))
        }
    }
}
