//! Core types for model interactions
//!
//! Shared by providers, the agent loop and the tool bridge.

mod message;
mod tool;
mod stream;
mod cancellation;

pub use message::{ChatMessage, ContentPart, MessageRole, MessageContent};
pub use tool::{Tool, ToolCall, ToolResult};
pub use stream::{StreamChunk, ModelReply};
pub use cancellation::CancellationToken;
