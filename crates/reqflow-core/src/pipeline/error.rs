//! Pipeline errors

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorKind;
use crate::providers::ProviderError;

/// Pipeline stage that asked a model for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extraction,
    MarkupSynthesis,
    Design,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Extraction => write!(f, "extraction"),
            Stage::MarkupSynthesis => write!(f, "markup synthesis"),
            Stage::Design => write!(f, "design"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generation failed during {stage}: {source}")]
    GenerationFailed {
        stage: Stage,
        #[source]
        source: ProviderError,
    },

    #[error("Generation failed during {stage}: model returned an empty response")]
    EmptyResponse { stage: Stage },

    /// `status` is `None` when no HTTP response arrived at all
    #[error("Rendering service error{}: {message}", status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    RenderServiceError { status: Option<u16>, message: String },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::GenerationFailed { .. } | PipelineError::EmptyResponse { .. } => {
                ErrorKind::GenerationFailed
            }
            PipelineError::RenderServiceError { .. } => ErrorKind::RenderServiceError,
            PipelineError::InvalidInput(_) | PipelineError::Io { .. } => ErrorKind::Other,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_names_status() {
        let err = PipelineError::RenderServiceError {
            status: Some(503),
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Rendering service error (HTTP 503): Service Unavailable");

        let err = PipelineError::RenderServiceError {
            status: None,
            message: "timed out".to_string(),
        };
        assert_eq!(err.to_string(), "Rendering service error: timed out");
        assert_eq!(err.kind(), ErrorKind::RenderServiceError);
    }
}
