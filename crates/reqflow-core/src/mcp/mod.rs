//! MCP (Model Context Protocol) client
//!
//! Uses the official rmcp SDK to reach remote tool services over streamable
//! HTTP or Unix sockets.
//!
//! # Example
//!
//! ```rust,ignore
//! use reqflow_core::mcp::McpClient;
//! use reqflow_core::tools::ToolService;
//!
//! let client = McpClient::connect_http("http://localhost:8000/mcp", logger).await?;
//! let tools = client.list_tools().await?;
//! let output = client.call_tool("generate_software_requirements", json!({
//!     "project_description": "A todo app"
//! })).await?;
//! ```

mod client;

pub use client::{output_from_result, McpClient, McpError, McpResult};
