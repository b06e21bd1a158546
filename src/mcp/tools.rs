//! MCP tool definitions and dispatch.
//!
//! Exposes two tools over the search backend: `search` executes a document
//! search and `get_index_stats` reports index-level statistics. Tool
//! definitions include JSON Schema descriptions so that MCP clients can
//! discover available capabilities.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::McpConfig;
use crate::mcp::format::{index_stats_json, search_result_content};
use crate::mcp::params::build_search_request;
use crate::mcp::transport::McpApiError;
use crate::search::SearchBackend;

/// A tool definition exposed by the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Returns the list of all tool definitions exposed by this MCP server.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "search".to_string(),
            description: "Search documents via Fess. Queries use Lucene syntax: terms combine \
                          with AND and OR, double quotes match a phrase, and the - prefix \
                          excludes a term."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "q": {
                        "type": "string",
                        "description": "Search query string"
                    },
                    "start": {
                        "type": "integer",
                        "description": "Start position of results"
                    },
                    "num": {
                        "type": "integer",
                        "description": "Number of results per page"
                    },
                    "offset": {
                        "type": "integer",
                        "description": "Record offset"
                    },
                    "sort": {
                        "type": "string",
                        "description": "Sort order, e.g. score.desc"
                    },
                    "lang": {
                        "type": ["string", "array"],
                        "description": "Language filter; a single code or an array of codes"
                    },
                    "fields.label": {
                        "type": "array",
                        "description": "Field labels to return"
                    },
                    "ex_q": {
                        "type": "array",
                        "description": "Extra query strings"
                    },
                    "sdh": {
                        "type": "string",
                        "description": "Similar document hash"
                    }
                },
                "required": ["q"]
            }),
        },
        ToolDefinition {
            name: "get_index_stats".to_string(),
            description: "Get index statistics and information".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// Handles a `tools/call` request, dispatching to the named tool.
pub fn handle_tool_call(
    backend: &dyn SearchBackend,
    config: &McpConfig,
    params: &Map<String, Value>,
) -> Result<Value, McpApiError> {
    let name = match params.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(McpApiError::invalid_params(
                "Missing required parameter: name",
            ));
        }
    };

    // An absent arguments key is rejected, but a present null is accepted
    // and treated as an empty map.
    let arguments = match params.get("arguments") {
        None => {
            return Err(McpApiError::invalid_params(
                "Missing required parameter: arguments",
            ));
        }
        Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(McpApiError::invalid_params(
                "Invalid parameter: arguments",
            ));
        }
    };

    match name {
        "search" => invoke_search(backend, config, &arguments),
        "get_index_stats" => invoke_index_stats(backend, config),
        _ => Err(McpApiError::invalid_params(format!(
            "Unknown tool: {}",
            name
        ))),
    }
}

/// Executes the `search` tool: normalize arguments, run the search, and
/// format hits into content blocks.
fn invoke_search(
    backend: &dyn SearchBackend,
    config: &McpConfig,
    arguments: &Map<String, Value>,
) -> Result<Value, McpApiError> {
    let request = build_search_request(arguments, config);
    let result = backend.search(&request)?;
    let blocks = search_result_content(&result, config.content_max_length);
    Ok(json!({ "content": blocks }))
}

/// Executes the `get_index_stats` tool: a single JSON text block with the
/// stats payload.
fn invoke_index_stats(
    backend: &dyn SearchBackend,
    config: &McpConfig,
) -> Result<Value, McpApiError> {
    let stats = backend.index_stats()?;
    let payload = index_stats_json(&stats, config);
    let text = serde_json::to_string_pretty(&payload)
        .map_err(|e| McpApiError::internal(e.to_string()))?;
    Ok(json!({ "content": [{ "type": "text", "text": text }] }))
}
