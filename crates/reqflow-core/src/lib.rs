//! reqflow core
//!
//! Tool orchestration over MCP plus the requirements diagram pipeline.
//!
//! ## Orchestration
//!
//! Registered services are queried for their operations, merged into a
//! catalog, and handed to a reasoning loop that lets a model call them:
//!
//! ```rust,ignore
//! use reqflow_core::agent::{Agent, AgentConfig};
//! use reqflow_core::tools::{DiscoveryClient, McpConnector, ToolBridge};
//!
//! let registry = settings.registry(logger.clone());
//! let connector = Arc::new(McpConnector::new(logger.clone()));
//! let report = DiscoveryClient::new(connector.clone(), settings.timeouts.discovery, logger.clone())
//!     .discover(&registry)
//!     .await?;
//! let bridge = Arc::new(ToolBridge::from_report(report, connector, settings.timeouts.invocation, logger.clone()));
//!
//! let agent = Agent::new(provider, bridge, AgentConfig::from_settings(&settings), logger);
//! let outcome = agent.run("Gather requirements for a todo app").await?;
//! ```
//!
//! ## Pipeline
//!
//! `pipeline::RequirementsPipeline` turns a project description into
//! requirements, a mermaid diagram and a rendered image; `server` exposes it
//! as an MCP tool.

pub mod agent;
pub mod config;
pub mod error;
pub mod logging;
pub mod mcp;
pub mod pipeline;
pub mod providers;
pub mod secrets;
pub mod server;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use error::ErrorKind;

pub use types::{
    ChatMessage, ContentPart, MessageRole, MessageContent,
    Tool, ToolCall, ToolResult,
    StreamChunk, ModelReply,
    CancellationToken,
};

pub use secrets::{SecretStore, SecretStoreError, EnvSecretStore, MemorySecretStore};

pub use logging::{Logger, NoOpLogger, TracingLogger};

pub use config::{ConfigError, ConfigFile, Settings};

pub use providers::{create_provider, Provider, ProviderError};

pub use tools::{
    CollisionPolicy, DiscoveryClient, DiscoveryReport, McpConnector, ServiceEndpoint,
    ServiceRegistry, ToolBridge, ToolCatalog, ToolError, TransportKind,
};

pub use agent::{Agent, AgentConfig, AgentError, RunOutcome};

pub use pipeline::{DesignGenerator, PipelineError, RequirementsPipeline};

pub use server::RequirementsServer;

pub use mcp::{McpClient, McpError};
