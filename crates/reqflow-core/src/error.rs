//! Error taxonomy shared across modules
//!
//! Each module keeps its own `thiserror` enum; `ErrorKind` is the coarse
//! classification callers match on without caring which module failed.

use serde::{Deserialize, Serialize};

/// Coarse classification of every failure reqflow can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A registered service could not be reached during discovery
    EndpointUnreachable,
    /// No service produced a manifest
    CatalogEmpty,
    /// Two services advertise the same operation and the policy rejects it
    DuplicateOperation,
    /// The model named an operation that is not in the catalog
    UnknownOperation,
    /// A tool call failed in transport, timed out, or was rejected remotely
    InvocationFailed,
    /// A text-generation call failed or returned nothing usable
    GenerationFailed,
    /// The diagram rendering service refused or could not be reached
    RenderServiceError,
    /// The reasoning loop ran out of steps
    StepLimitExceeded,
    /// A required setting or credential is absent at startup
    ConfigurationMissing,
    /// Anything that does not fit the categories above (I/O, bad input)
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::EndpointUnreachable => "EndpointUnreachable",
            ErrorKind::CatalogEmpty => "CatalogEmpty",
            ErrorKind::DuplicateOperation => "DuplicateOperation",
            ErrorKind::UnknownOperation => "UnknownOperation",
            ErrorKind::InvocationFailed => "InvocationFailed",
            ErrorKind::GenerationFailed => "GenerationFailed",
            ErrorKind::RenderServiceError => "RenderServiceError",
            ErrorKind::StepLimitExceeded => "StepLimitExceeded",
            ErrorKind::ConfigurationMissing => "ConfigurationMissing",
            ErrorKind::Other => "Other",
        };
        f.write_str(name)
    }
}
