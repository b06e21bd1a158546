//! Interface boundary to the document-search backend.
//!
//! The MCP layer consumes the backend through the [`SearchBackend`] trait and
//! never sees engine internals. Document field values arrive as [`DocValue`]s,
//! a closed set of shapes that the result formatter can sanitize without
//! inspecting backend types.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::errors::Result;

/// A normalized search invocation, derived from a raw MCP argument map.
///
/// Paging fields are already defaulted and clamped; the query is passed
/// through untouched and an absent query is the backend's responsibility
/// to reject.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Query string; `None` when the caller omitted `q`.
    pub query: Option<String>,
    /// Start position, always `>= 0`.
    pub start: u64,
    /// Page size, always within `[1, max_page_size]`.
    pub page_size: u32,
    /// Record offset; may be negative when the caller sent one.
    pub offset: i64,
    /// Sort order, e.g. `score.desc`.
    pub sort: Option<String>,
    /// Requested field labels and other field selectors.
    pub fields: HashMap<String, Vec<String>>,
    /// Extra boolean/free-text conditions.
    pub conditions: HashMap<String, Vec<String>>,
    /// Language filter codes; empty when unfiltered.
    pub languages: Vec<String>,
    /// Extra queries; `None` when the key was absent (distinct from empty).
    pub extra_queries: Option<Vec<String>>,
    /// Similar-document hash for similarity lookups.
    pub similar_doc_hash: Option<String>,
}

/// A rich-text highlight fragment produced by the search engine.
///
/// Not a plain JSON value; the formatter renders it through its string
/// representation.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightFragment {
    pub text: String,
}

impl HighlightFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for HighlightFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A document field value from the backend.
///
/// Closed set of shapes: scalars, ordered sequences, string-keyed mappings,
/// and the opaque highlight fragment leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Seq(Vec<DocValue>),
    Map(BTreeMap<String, DocValue>),
    Fragment(HighlightFragment),
}

impl From<serde_json::Value> for DocValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DocValue::Null,
            serde_json::Value::Bool(b) => DocValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DocValue::Int(i)
                } else {
                    DocValue::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => DocValue::Text(s),
            serde_json::Value::Array(items) => {
                DocValue::Seq(items.into_iter().map(DocValue::from).collect())
            }
            serde_json::Value::Object(map) => DocValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, DocValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// A single search hit: field name to value.
pub type Document = BTreeMap<String, DocValue>;

/// One facet value and its document count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

/// Counts for a single faceted field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetField {
    pub name: String,
    pub values: Vec<FacetCount>,
}

/// Facet data attached to a search result when the engine computed any.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct FacetData {
    pub fields: Vec<FacetField>,
    pub queries: Vec<FacetCount>,
}

/// The outcome of a search invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The query as executed by the engine.
    pub query: String,
    /// Engine-assigned query identifier.
    pub query_id: Option<String>,
    /// Total execution time in seconds.
    pub exec_time: f64,
    /// Effective page size.
    pub page_size: u32,
    /// Current page number, 1-based.
    pub page_number: u32,
    /// Total matching record count.
    pub record_count: u64,
    /// Total page count.
    pub page_count: u32,
    /// The hits for the requested page.
    pub documents: Vec<Document>,
    /// Facet data, present only when the engine computed facets.
    pub facets: Option<FacetData>,
}

/// Process memory snapshot reported alongside index statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct MemorySnapshot {
    /// Resident set size in bytes; 0 when unavailable.
    pub rss_bytes: u64,
    /// Virtual memory size in bytes; 0 when unavailable.
    pub vm_size_bytes: u64,
}

/// Index-level statistics from the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    /// Number of documents in the index.
    pub document_count: u64,
    /// Identity of the backing server.
    pub server_name: String,
    /// Memory snapshot of the serving process.
    pub memory: MemorySnapshot,
}

/// The document-search backend consumed by the MCP layer.
///
/// Implementations must be shareable across concurrent dispatches; the
/// trait imposes no timeout or retry policy.
pub trait SearchBackend: Send + Sync {
    /// Executes a search and returns the requested page of hits.
    fn search(&self, request: &SearchRequest) -> Result<SearchResult>;

    /// Returns index-level statistics.
    fn index_stats(&self) -> Result<IndexStats>;
}
