//! MCP prompt catalog and rendering.
//!
//! Two static prompts turn search parameters into a chat-style user message:
//! `basic_search` takes a query string, `advanced_search` adds optional sort
//! and result-count lines. Optional arguments are suppressed when empty after
//! string conversion.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::mcp::transport::McpApiError;

/// An argument accepted by a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// A prompt definition exposed by the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Lookup key for `prompts/get`.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Accepted arguments in declaration order.
    pub arguments: Vec<PromptArgument>,
}

/// Returns the list of all prompt definitions exposed by this MCP server.
pub fn get_prompt_definitions() -> Vec<PromptDefinition> {
    vec![
        PromptDefinition {
            name: "basic_search".to_string(),
            description: "Perform a basic search with a query string".to_string(),
            arguments: vec![PromptArgument {
                name: "query".to_string(),
                description: "The search query".to_string(),
                required: true,
            }],
        },
        PromptDefinition {
            name: "advanced_search".to_string(),
            description: "Perform an advanced search with sort order and result count options"
                .to_string(),
            arguments: vec![
                PromptArgument {
                    name: "query".to_string(),
                    description: "The search query".to_string(),
                    required: true,
                },
                PromptArgument {
                    name: "sort".to_string(),
                    description: "Sort order for results".to_string(),
                    required: false,
                },
                PromptArgument {
                    name: "num".to_string(),
                    description: "Number of results to return".to_string(),
                    required: false,
                },
            ],
        },
    ]
}

/// Handles a `prompts/get` request, rendering the named prompt.
pub fn handle_prompt_get(params: &Map<String, Value>) -> Result<Value, McpApiError> {
    let name = match params.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(McpApiError::invalid_params(
                "Missing required parameter: name",
            ));
        }
    };

    let empty = Map::new();
    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(McpApiError::invalid_params(
                "Invalid parameter: arguments",
            ));
        }
    };

    let text = match name {
        "basic_search" => {
            let query = required_argument(arguments, "query")?;
            format!("Please search for: {}", query)
        }
        "advanced_search" => {
            let query = required_argument(arguments, "query")?;
            let mut text = format!(
                "Please perform an advanced search with the following criteria:\nQuery: {}",
                query
            );
            if let Some(sort) = optional_argument(arguments, "sort") {
                text.push_str(&format!("\nSort: {}", sort));
            }
            if let Some(num) = optional_argument(arguments, "num") {
                text.push_str(&format!("\nNumber of results: {}", num));
            }
            text
        }
        _ => {
            return Err(McpApiError::invalid_params(format!(
                "Unknown prompt: {}",
                name
            )));
        }
    };

    Ok(json!({
        "messages": [{
            "role": "user",
            "content": { "type": "text", "text": text }
        }]
    }))
}

/// A required argument must be present and non-empty after string conversion.
fn required_argument(arguments: &Map<String, Value>, name: &str) -> Result<String, McpApiError> {
    match optional_argument(arguments, name) {
        Some(value) => Ok(value),
        None => Err(McpApiError::invalid_params(format!(
            "Missing required argument: {}",
            name
        ))),
    }
}

/// An optional argument is included only when present and non-empty after
/// string conversion; numbers and booleans are stringified.
fn optional_argument(arguments: &Map<String, Value>, name: &str) -> Option<String> {
    let text = match arguments.get(name)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
