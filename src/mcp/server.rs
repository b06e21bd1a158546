//! MCP server that reads JSON-RPC 2.0 messages from stdin and writes
//! responses to stdout.
//!
//! The dispatcher validates the envelope, routes to a fixed set of MCP
//! methods, and wraps every outcome in a JSON-RPC success or error
//! envelope. It holds no mutable state, so concurrent dispatches are safe.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error};

use crate::config::McpConfig;
use crate::errors::Result;
use crate::search::SearchBackend;

use super::prompts::{get_prompt_definitions, handle_prompt_get};
use super::resources::{get_resource_definitions, handle_resource_read};
use super::tools::{get_tool_definitions, handle_tool_call};
use super::transport::{ErrorCode, JsonRpcResponse, McpApiError};

/// MCP protocol version implemented by this server.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// The MCP methods this server routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum McpMethod {
    Initialize,
    Initialized,
    Ping,
    ToolsList,
    ToolsCall,
    ResourcesList,
    ResourcesRead,
    PromptsList,
    PromptsGet,
}

impl McpMethod {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "initialize" => Some(Self::Initialize),
            "initialized" | "notifications/initialized" => Some(Self::Initialized),
            "ping" => Some(Self::Ping),
            "tools/list" => Some(Self::ToolsList),
            "tools/call" => Some(Self::ToolsCall),
            "resources/list" => Some(Self::ResourcesList),
            "resources/read" => Some(Self::ResourcesRead),
            "prompts/list" => Some(Self::PromptsList),
            "prompts/get" => Some(Self::PromptsGet),
            _ => None,
        }
    }
}

/// The MCP server wrapping a search backend.
pub struct McpServer {
    backend: Arc<dyn SearchBackend>,
    config: McpConfig,
}

impl McpServer {
    /// Creates a new MCP server over the given backend.
    pub fn new(backend: Arc<dyn SearchBackend>, config: McpConfig) -> Self {
        Self { backend, config }
    }

    /// Runs the server, reading JSON-RPC requests from stdin and writing
    /// responses to stdout. Runs until stdin is closed.
    pub async fn run(&self) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(line) {
                let output = format!("{}\n", response);
                if let Err(e) = stdout.write_all(output.as_bytes()).await {
                    error!(error = %e, "failed to write response");
                    break;
                }
                if let Err(e) = stdout.flush().await {
                    error!(error = %e, "failed to flush stdout");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handles one raw JSON-RPC message, returning the serialized response.
    ///
    /// Returns `None` for notifications. The caller always gets a
    /// well-formed envelope otherwise, even when serialization itself
    /// fails.
    pub fn handle_message(&self, raw: &str) -> Option<String> {
        let response = self.dispatch(raw)?;
        match serde_json::to_string(&response) {
            Ok(line) => Some(line),
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                Some(format!(
                    "{{\"jsonrpc\":\"2.0\",\"id\":null,\"error\":{{\"code\":{},\"message\":\"Internal error\"}}}}",
                    ErrorCode::InternalError.as_i32()
                ))
            }
        }
    }

    /// Parses and dispatches one request; `None` means a notification with
    /// no response.
    fn dispatch(&self, raw: &str) -> Option<JsonRpcResponse> {
        let body: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "failed to parse request body");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    ErrorCode::InternalError,
                    format!("failed to parse JSON-RPC request: {}", e),
                ));
            }
        };

        let Some(request) = body.as_object() else {
            return Some(JsonRpcResponse::error(
                Value::Null,
                ErrorCode::InternalError,
                "request body must be a JSON object".to_string(),
            ));
        };

        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let jsonrpc = request.get("jsonrpc").and_then(Value::as_str);
        let method = request.get("method").and_then(Value::as_str);

        let (Some("2.0"), Some(method)) = (jsonrpc, method) else {
            return Some(JsonRpcResponse::error(
                id,
                ErrorCode::InvalidRequest,
                "Invalid JSON-RPC request".to_string(),
            ));
        };

        let params = match request.get("params") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return Some(JsonRpcResponse::error(
                    id,
                    ErrorCode::InvalidParams,
                    "Invalid params".to_string(),
                ));
            }
        };

        debug!(method = %method, "dispatching request");

        let route = McpMethod::from_name(method);
        if route == Some(McpMethod::Initialized) {
            // Notification - no response required.
            return None;
        }

        let outcome: std::result::Result<Value, McpApiError> = match route {
            Some(McpMethod::Initialize) => Ok(self.handle_initialize()),
            Some(McpMethod::Ping) => Ok(json!({})),
            Some(McpMethod::ToolsList) => Ok(json!({ "tools": get_tool_definitions() })),
            Some(McpMethod::ToolsCall) => {
                handle_tool_call(self.backend.as_ref(), &self.config, &params)
            }
            Some(McpMethod::ResourcesList) => {
                Ok(json!({ "resources": get_resource_definitions() }))
            }
            Some(McpMethod::ResourcesRead) => {
                handle_resource_read(self.backend.as_ref(), &self.config, &params)
            }
            Some(McpMethod::PromptsList) => Ok(json!({ "prompts": get_prompt_definitions() })),
            Some(McpMethod::PromptsGet) => handle_prompt_get(&params),
            Some(McpMethod::Initialized) | None => Err(McpApiError::method_not_found(format!(
                "Unknown method: {}",
                method
            ))),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::from_api_error(id, err),
        })
    }

    /// Handles the `initialize` method, returning server capabilities.
    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {},
                "resources": {},
                "prompts": {}
            },
            "serverInfo": {
                "name": "fess-mcp-server",
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }
}
