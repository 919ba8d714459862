//! Reasoning loop errors

use thiserror::Error;

use crate::error::ErrorKind;
use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Generation failed at step {step}: {source}")]
    GenerationFailed {
        step: usize,
        #[source]
        source: ProviderError,
    },

    #[error("Model reply at step {step} held neither text nor a tool call")]
    EmptyReply { step: usize },

    #[error("Step limit of {limit} model round-trips exceeded")]
    StepLimitExceeded { limit: usize },
}

impl AgentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AgentError::GenerationFailed { .. } | AgentError::EmptyReply { .. } => ErrorKind::GenerationFailed,
            AgentError::StepLimitExceeded { .. } => ErrorKind::StepLimitExceeded,
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
