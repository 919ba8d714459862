//! Seam between the orchestration core and remote tool services

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::logging::Logger;
use crate::mcp::{McpClient, McpResult};
use crate::types::Tool;

use super::registry::ServiceEndpoint;

/// Outcome of one remote call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub content: String,
    /// The service reported the call as failed
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// A live session with one remote tool service
#[async_trait]
pub trait ToolService: Send + Sync {
    /// Operations the service advertises
    async fn list_tools(&self) -> McpResult<Vec<Tool>>;

    /// Invoke one operation with a JSON object of named arguments
    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<ToolOutput>;
}

/// Opens sessions to registered endpoints
#[async_trait]
pub trait ServiceConnector: Send + Sync {
    async fn connect(&self, endpoint: &ServiceEndpoint) -> McpResult<Arc<dyn ToolService>>;
}

/// Connector speaking MCP over the endpoint's declared transport
pub struct McpConnector {
    logger: Arc<dyn Logger>,
}

impl McpConnector {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

#[async_trait]
impl ServiceConnector for McpConnector {
    async fn connect(&self, endpoint: &ServiceEndpoint) -> McpResult<Arc<dyn ToolService>> {
        let client = McpClient::connect(endpoint, Arc::clone(&self.logger)).await?;
        Ok(Arc::new(client))
    }
}
