//! MCP (Model Context Protocol) server for Fess document search.
//!
//! Provides a JSON-RPC 2.0 interface over stdio so that AI assistants can
//! search documents interactively. Exposes tools for searching and index
//! statistics, a statistics resource, and search prompt templates.

/// MCP server implementation and request dispatch.
pub mod server;

/// Tool definitions and dispatch.
pub mod tools;

/// Resource definitions and reads.
pub mod resources;

/// Prompt definitions and rendering.
pub mod prompts;

/// Search argument normalization.
pub mod params;

/// Result formatting and sanitization.
pub mod format;

/// JSON-RPC 2.0 transport types.
pub mod transport;

pub use format::ContentBlock;
pub use prompts::{get_prompt_definitions, handle_prompt_get, PromptArgument, PromptDefinition};
pub use resources::{get_resource_definitions, handle_resource_read, ResourceDefinition};
pub use server::{McpServer, PROTOCOL_VERSION};
pub use tools::{get_tool_definitions, handle_tool_call, ToolDefinition};
pub use transport::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpApiError};
