//! Errors raised by discovery and invocation

use thiserror::Error;

use crate::error::ErrorKind;

/// Failures of the discovery client, catalog and invocation bridge
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Endpoint '{endpoint}' unreachable: {reason}")]
    EndpointUnreachable { endpoint: String, reason: String },

    /// `failed` holds one `EndpointUnreachable` per registered endpoint
    #[error("No tools discovered; {}", describe_failures(failed))]
    CatalogEmpty { failed: Vec<ToolError> },

    #[error("Operation '{name}' is advertised by both '{first}' and '{second}'")]
    DuplicateOperation {
        name: String,
        first: String,
        second: String,
    },

    #[error("Unknown operation '{name}'; available: [{}]", available.join(", "))]
    UnknownOperation { name: String, available: Vec<String> },

    #[error("Invocation of '{operation}' failed: {cause}")]
    InvocationFailed { operation: String, cause: String },
}

impl ToolError {
    pub fn unreachable(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EndpointUnreachable {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    pub fn invocation_failed(operation: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::InvocationFailed {
            operation: operation.into(),
            cause: cause.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::EndpointUnreachable { .. } => ErrorKind::EndpointUnreachable,
            ToolError::CatalogEmpty { .. } => ErrorKind::CatalogEmpty,
            ToolError::DuplicateOperation { .. } => ErrorKind::DuplicateOperation,
            ToolError::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            ToolError::InvocationFailed { .. } => ErrorKind::InvocationFailed,
        }
    }
}

pub type ToolOpResult<T> = Result<T, ToolError>;

fn describe_failures(failed: &[ToolError]) -> String {
    if failed.is_empty() {
        return "no endpoints registered".to_string();
    }
    let reasons: Vec<String> = failed.iter().map(ToString::to_string).collect();
    format!("failed endpoints: [{}]", reasons.join("; "))
}
