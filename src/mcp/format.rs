//! Result formatting for MCP responses.
//!
//! Shapes backend search results into MCP content blocks: sanitizes
//! heterogeneous document values into plain JSON, renders each hit as a
//! Markdown text block with truncated content, and shapes facet data when
//! the engine computed any.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::McpConfig;
use crate::search::{DocValue, Document, FacetData, IndexStats, SearchResult};

/// The unit of MCP result payload: a typed text fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ContentBlock {
    /// Creates a text content block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Converts a backend document value into a plain JSON value.
///
/// Total over every [`DocValue`] shape: scalars pass through, sequences and
/// mappings recurse, and opaque highlight fragments collapse to their string
/// representation.
pub fn sanitize(value: &DocValue) -> Value {
    match value {
        DocValue::Null => Value::Null,
        DocValue::Bool(b) => json!(b),
        DocValue::Int(i) => json!(i),
        DocValue::Float(f) => json!(f),
        DocValue::Text(s) => json!(s),
        DocValue::Seq(items) => Value::Array(items.iter().map(sanitize).collect()),
        DocValue::Map(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), sanitize(item)))
                .collect(),
        ),
        DocValue::Fragment(fragment) => json!(fragment.to_string()),
    }
}

/// Truncates content to `max_length` leading characters, appending `"..."`
/// when anything was cut. Content at or under the limit is unchanged.
pub fn truncate_content(content: &str, max_length: usize) -> String {
    if content.chars().count() <= max_length {
        content.to_string()
    } else {
        let mut truncated: String = content.chars().take(max_length).collect();
        truncated.push_str("...");
        truncated
    }
}

/// Renders one search hit as a Markdown text block.
///
/// The Score line appears only when the document carries a non-null score;
/// missing title/URL/content render as empty strings.
pub fn render_document(doc: &Document, max_length: usize) -> ContentBlock {
    let title = field_display(doc, "title");
    let url = field_display(doc, "url");
    let content = field_display(doc, "content");

    let mut text = format!("**Title**: {}\n**URL**: {}\n", title, url);
    match doc.get("score") {
        Some(DocValue::Null) | None => {}
        Some(score) => {
            text.push_str(&format!("**Score**: {}\n", value_display(score)));
        }
    }
    text.push('\n');
    text.push_str(&truncate_content(&content, max_length));

    ContentBlock::text(text)
}

/// Shapes the full search result into content blocks: one per hit, plus a
/// trailing facet summary only when the engine computed facets.
pub fn search_result_content(result: &SearchResult, max_length: usize) -> Vec<ContentBlock> {
    let mut blocks: Vec<ContentBlock> = result
        .documents
        .iter()
        .map(|doc| render_document(doc, max_length))
        .collect();

    if let Some(facets) = &result.facets {
        let shaped = shape_facets(facets);
        blocks.push(ContentBlock::text(
            serde_json::to_string_pretty(&shaped).unwrap_or_default(),
        ));
    }

    blocks
}

/// Converts facet data into the wire shape: field facets as
/// `{name, result: [{value, count}]}` entries, query facets as a flat
/// `[{value, count}]` list.
pub fn shape_facets(facets: &FacetData) -> Value {
    json!({
        "facet_field": facets
            .fields
            .iter()
            .map(|field| {
                json!({
                    "name": field.name,
                    "result": field
                        .values
                        .iter()
                        .map(|count| json!({"value": count.value, "count": count.count}))
                        .collect::<Vec<_>>(),
                })
            })
            .collect::<Vec<_>>(),
        "facet_query": facets
            .queries
            .iter()
            .map(|count| json!({"value": count.value, "count": count.count}))
            .collect::<Vec<_>>(),
    })
}

/// Builds the index statistics payload shared by the `get_index_stats` tool
/// and the `fess://index/stats` resource.
pub fn index_stats_json(stats: &IndexStats, config: &McpConfig) -> Value {
    json!({
        "document_count": stats.document_count,
        "server_name": stats.server_name,
        "default_page_size": config.default_page_size,
        "max_page_size": config.max_page_size,
        "memory": stats.memory,
    })
}

fn field_display(doc: &Document, key: &str) -> String {
    doc.get(key).map(value_display).unwrap_or_default()
}

fn value_display(value: &DocValue) -> String {
    match sanitize(value) {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}
