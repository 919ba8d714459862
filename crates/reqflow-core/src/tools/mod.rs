//! Tool orchestration plumbing
//!
//! ```text
//! ServiceRegistry ──► DiscoveryClient ──► ToolCatalog ──► ToolBridge
//!   (endpoints)        (tools/list,         (name ->        (tools/call,
//!                       concurrent)          descriptor)     timeout)
//! ```
//!
//! Remote services are reached through the `ServiceConnector` / `ToolService`
//! seam; production uses MCP via `McpConnector`.

mod bridge;
mod catalog;
mod discovery;
mod error;
mod registry;
mod service;

pub use bridge::ToolBridge;
pub use catalog::{CollisionPolicy, ToolCatalog, ToolDescriptor};
pub use discovery::{DiscoveryClient, DiscoveryReport};
pub use error::{ToolError, ToolOpResult};
pub use registry::{ServiceEndpoint, ServiceRegistry, TransportKind};
pub use service::{McpConnector, ServiceConnector, ToolOutput, ToolService};

#[cfg(test)]
pub(crate) use discovery::testing;
