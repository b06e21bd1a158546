//! MCP resource catalog and reads.
//!
//! A single URI-addressed resource is exposed: the index statistics view.
//! URI matching is exact and case-sensitive, with no normalization.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::McpConfig;
use crate::mcp::format::index_stats_json;
use crate::mcp::transport::McpApiError;
use crate::search::SearchBackend;

/// URI of the index statistics resource.
pub const INDEX_STATS_URI: &str = "fess://index/stats";

/// A resource definition exposed by the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Lookup key for `resources/read`.
    pub uri: String,
    /// Human-readable name.
    pub name: String,
    /// Description of the resource contents.
    pub description: String,
    /// MIME type of the content returned by a read.
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Returns the list of all resource definitions exposed by this MCP server.
pub fn get_resource_definitions() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: INDEX_STATS_URI.to_string(),
        name: "Index Statistics".to_string(),
        description: "Fess index statistics and configuration information".to_string(),
        mime_type: "application/json".to_string(),
    }]
}

/// Handles a `resources/read` request.
pub fn handle_resource_read(
    backend: &dyn SearchBackend,
    config: &McpConfig,
    params: &Map<String, Value>,
) -> Result<Value, McpApiError> {
    let uri = match params.get("uri").and_then(Value::as_str) {
        Some(uri) if !uri.trim().is_empty() => uri,
        _ => {
            return Err(McpApiError::invalid_params(
                "Missing required parameter: uri",
            ));
        }
    };

    if uri != INDEX_STATS_URI {
        return Err(McpApiError::invalid_params(format!(
            "Unknown resource: {}",
            uri
        )));
    }

    let stats = backend.index_stats()?;
    let payload = index_stats_json(&stats, config);
    let text = serde_json::to_string_pretty(&payload)
        .map_err(|e| McpApiError::internal(e.to_string()))?;

    Ok(json!({
        "contents": [{
            "uri": INDEX_STATS_URI,
            "mimeType": "application/json",
            "text": text,
        }]
    }))
}
