//! Provider error types

use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur while talking to a text-generation provider
///
/// Every variant classifies as `ErrorKind::GenerationFailed`; callers add
/// their own context (which stage, which model) when surfacing it.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API key is required for {provider}")]
    MissingApiKey { provider: String },

    #[error("{provider} API error ({status}): {message}")]
    ApiError {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn api_error(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::GenerationFailed
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
