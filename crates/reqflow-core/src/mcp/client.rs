//! MCP client using the official rmcp SDK
//!
//! Connects to tool services over streamable HTTP or a Unix socket and
//! implements `ToolService` for discovery and invocation.

use async_trait::async_trait;
use std::sync::Arc;

use rmcp::{
    model::{CallToolRequestParams, CallToolResult, ClientCapabilities, ClientInfo, Implementation, RawContent},
    service::RunningService,
    RoleClient, ServiceExt,
};
use serde_json::Value;
use thiserror::Error;

#[cfg(unix)]
use tokio::net::UnixStream;

use crate::logging::Logger;
use crate::tools::{ServiceEndpoint, ToolOutput, ToolService, TransportKind};
use crate::types::Tool;

/// MCP client errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Tool call failed: {0}")]
    ToolCallFailed(String),

    #[error("Unsupported transport: {0}")]
    UnsupportedTransport(TransportKind),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type McpResult<T> = Result<T, McpError>;

/// MCP client bound to one remote tool service
pub struct McpClient {
    client: RunningService<RoleClient, ClientInfo>,
    logger: Arc<dyn Logger>,
}

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "reqflow".to_string(),
            title: Some("reqflow".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website_url: None,
            icons: None,
        },
    }
}

impl McpClient {
    /// Connect using whatever transport the endpoint names
    pub async fn connect(endpoint: &ServiceEndpoint, logger: Arc<dyn Logger>) -> McpResult<Self> {
        match endpoint.transport {
            TransportKind::StreamableHttp => Self::connect_http(&endpoint.address, logger).await,
            #[cfg(unix)]
            TransportKind::UnixSocket => Self::connect_unix(&endpoint.address, logger).await,
            #[cfg(not(unix))]
            TransportKind::UnixSocket => Err(McpError::UnsupportedTransport(TransportKind::UnixSocket)),
        }
    }

    /// Connect to an MCP server over a Unix socket
    #[cfg(unix)]
    pub async fn connect_unix(socket_path: &str, logger: Arc<dyn Logger>) -> McpResult<Self> {
        logger.info(&format!("[McpClient] Connecting to Unix socket: {}", socket_path));

        let stream = UnixStream::connect(socket_path)
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;

        let client = client_info()
            .serve(stream)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info("[McpClient] Connected and initialized successfully");

        Ok(Self { client, logger })
    }

    /// Connect to an MCP server over HTTP (Streamable HTTP transport)
    pub async fn connect_http(url: &str, logger: Arc<dyn Logger>) -> McpResult<Self> {
        use rmcp::transport::StreamableHttpClientTransport;

        logger.info(&format!("[McpClient] Connecting to HTTP: {}", url));

        let transport = StreamableHttpClientTransport::from_uri(url.to_string());

        let client = client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info("[McpClient] Connected and initialized successfully");

        Ok(Self { client, logger })
    }
}

#[async_trait]
impl ToolService for McpClient {
    async fn list_tools(&self) -> McpResult<Vec<Tool>> {
        let result = self
            .client
            .list_tools(Default::default())
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;

        self.logger.info(&format!("[McpClient] Listed {} tools", result.tools.len()));

        Ok(result
            .tools
            .into_iter()
            .map(|t| Tool {
                name: t.name.to_string(),
                description: t.description.map(|d| d.to_string()).unwrap_or_default(),
                input_schema: Some(Value::Object((*t.input_schema).clone())),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<ToolOutput> {
        self.logger.info(&format!("[McpClient] Calling tool: {}", name));

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: arguments.as_object().cloned(),
            task: None,
        };

        let result = self
            .client
            .call_tool(params)
            .await
            .map_err(|e| McpError::ToolCallFailed(e.to_string()))?;

        Ok(output_from_result(result))
    }
}

/// Flatten a call result into text
///
/// Text blocks are joined with newlines; when a server only sends structured
/// content, its JSON serialization stands in for the text.
pub fn output_from_result(result: CallToolResult) -> ToolOutput {
    let texts: Vec<String> = result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.clone()),
            _ => None,
        })
        .collect();

    let content = if texts.is_empty() {
        result
            .structured_content
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default()
    } else {
        texts.join("\n")
    };

    ToolOutput {
        content,
        is_error: result.is_error.unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::Content;
    use serde_json::json;

    #[test]
    fn test_output_prefers_text_blocks() {
        let result = CallToolResult::success(vec![Content::text("one"), Content::text("two")]);
        let output = output_from_result(result);
        assert_eq!(output.content, "one\ntwo");
        assert!(!output.is_error);
    }

    #[test]
    fn test_output_falls_back_to_structured_content() {
        let mut result = CallToolResult::success(vec![]);
        result.structured_content = Some(json!({"functional": ["add task"]}));
        let output = output_from_result(result);
        assert_eq!(output.content, r#"{"functional":["add task"]}"#);
    }

    #[test]
    fn test_output_keeps_error_flag() {
        let output = output_from_result(CallToolResult::error(vec![Content::text("bad input")]));
        assert!(output.is_error);
        assert_eq!(output.content, "bad input");
    }
}
