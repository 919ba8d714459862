//! Configuration errors

use crate::error::ErrorKind;

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required credential or setting is absent; fatal at startup
    #[error("Configuration missing: {key} ({hint})")]
    ConfigurationMissing { key: String, hint: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub fn missing(key: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::ConfigurationMissing {
            key: key.into(),
            hint: hint.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::ConfigurationMissing { .. } => ErrorKind::ConfigurationMissing,
            _ => ErrorKind::Other,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
