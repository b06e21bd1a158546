//! HTTP client for the Fess JSON search API.
//!
//! Implements [`SearchBackend`] against a remote Fess instance. Each search
//! invocation becomes a single GET to `/json/`; failures surface as
//! [`FessMcpError`] values and never panic.

use serde_json::Value;
use tracing::debug;

use crate::errors::{FessMcpError, Result};
use crate::search::{
    DocValue, Document, FacetCount, FacetData, FacetField, IndexStats, MemorySnapshot,
    SearchBackend, SearchRequest, SearchResult,
};

/// A search backend talking to a Fess server over its JSON API.
pub struct FessClient {
    base_url: String,
    server_name: String,
}

impl FessClient {
    /// Creates a client for the Fess instance at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let server_name = format!("Fess ({})", base_url);
        Self {
            base_url,
            server_name,
        }
    }

    /// Performs a GET against `/json/` and decodes the response body.
    ///
    /// Returns the failure as a plain message so that callers can attach
    /// their own error context.
    fn get_json(&self, pairs: &[(String, String)]) -> std::result::Result<Value, String> {
        let url = format!("{}/json/", self.base_url);
        debug!(url = %url, params = pairs.len(), "fess request");

        let mut request = ureq::get(&url);
        for (key, value) in pairs {
            request = request.query(key, value);
        }

        let mut response = request.call().map_err(|e| e.to_string())?;
        response
            .body_mut()
            .read_json::<Value>()
            .map_err(|e| e.to_string())
    }
}

impl SearchBackend for FessClient {
    fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let query = request.query.clone().unwrap_or_default();
        let pairs = query_pairs(request);
        let body = self.get_json(&pairs).map_err(|message| FessMcpError::Search {
            message,
            query: query.clone(),
        })?;
        parse_search_response(&body, &query)
    }

    fn index_stats(&self) -> Result<IndexStats> {
        let pairs = vec![
            ("q".to_string(), "*:*".to_string()),
            ("num".to_string(), "1".to_string()),
        ];
        let body = self
            .get_json(&pairs)
            .map_err(|message| FessMcpError::Stats { message })?;

        let document_count = body
            .get("response")
            .and_then(|response| response.get("record_count"))
            .and_then(Value::as_u64)
            .unwrap_or(0);

        Ok(IndexStats {
            document_count,
            server_name: self.server_name.clone(),
            memory: memory_snapshot(),
        })
    }
}

/// Expands a normalized search request into Fess JSON API query parameters.
fn query_pairs(request: &SearchRequest) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Some(q) = &request.query {
        pairs.push(("q".to_string(), q.clone()));
    }
    pairs.push(("start".to_string(), request.start.to_string()));
    pairs.push(("num".to_string(), request.page_size.to_string()));
    if request.offset != 0 {
        pairs.push(("offset".to_string(), request.offset.to_string()));
    }
    if let Some(sort) = &request.sort {
        pairs.push(("sort".to_string(), sort.clone()));
    }
    for lang in &request.languages {
        pairs.push(("lang".to_string(), lang.clone()));
    }
    for (field, values) in &request.fields {
        for value in values {
            pairs.push((format!("fields.{}", field), value.clone()));
        }
    }
    for (condition, values) in &request.conditions {
        for value in values {
            pairs.push((format!("as.{}", condition), value.clone()));
        }
    }
    if let Some(extra) = &request.extra_queries {
        for q in extra {
            pairs.push(("ex_q".to_string(), q.clone()));
        }
    }
    if let Some(sdh) = &request.similar_doc_hash {
        pairs.push(("sdh".to_string(), sdh.clone()));
    }
    pairs
}

/// Decodes the Fess `/json/` response envelope into a [`SearchResult`].
fn parse_search_response(body: &Value, query: &str) -> Result<SearchResult> {
    let response = body
        .get("response")
        .and_then(Value::as_object)
        .ok_or_else(|| FessMcpError::Search {
            message: "missing response object in search reply".to_string(),
            query: query.to_string(),
        })?;

    let documents: Vec<Document> = response
        .get("result")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|hit| {
                    hit.iter()
                        .map(|(key, value)| (key.clone(), DocValue::from(value.clone())))
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(SearchResult {
        query: response
            .get("q")
            .and_then(Value::as_str)
            .unwrap_or(query)
            .to_string(),
        query_id: response
            .get("query_id")
            .and_then(Value::as_str)
            .map(String::from),
        exec_time: response
            .get("exec_time")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        page_size: response
            .get("page_size")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32,
        page_number: response
            .get("page_number")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32,
        record_count: response
            .get("record_count")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        page_count: response
            .get("page_count")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32,
        documents,
        facets: parse_facets(response),
    })
}

/// Decodes facet data when the response carries any.
fn parse_facets(response: &serde_json::Map<String, Value>) -> Option<FacetData> {
    let field_entries = response.get("facet_field").and_then(Value::as_array);
    let query_entries = response.get("facet_query").and_then(Value::as_array);
    if field_entries.is_none() && query_entries.is_none() {
        return None;
    }

    let fields = field_entries
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let name = entry.get("name")?.as_str()?.to_string();
                    let values = entry
                        .get("result")
                        .and_then(Value::as_array)
                        .map(|counts| counts.iter().filter_map(parse_facet_count).collect())
                        .unwrap_or_default();
                    Some(FacetField { name, values })
                })
                .collect()
        })
        .unwrap_or_default();

    let queries = query_entries
        .map(|entries| entries.iter().filter_map(parse_facet_count).collect())
        .unwrap_or_default();

    Some(FacetData { fields, queries })
}

fn parse_facet_count(entry: &Value) -> Option<FacetCount> {
    Some(FacetCount {
        value: entry.get("value")?.as_str()?.to_string(),
        count: entry.get("count")?.as_u64()?,
    })
}

/// Captures a process memory snapshot from `/proc/self/status`.
///
/// Returns zeros when the file is unavailable (non-Linux hosts).
fn memory_snapshot() -> MemorySnapshot {
    read_proc_status().unwrap_or_default()
}

fn read_proc_status() -> Option<MemorySnapshot> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let mut snapshot = MemorySnapshot::default();
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            snapshot.rss_bytes = parse_kib(rest);
        } else if let Some(rest) = line.strip_prefix("VmSize:") {
            snapshot.vm_size_bytes = parse_kib(rest);
        }
    }
    Some(snapshot)
}

fn parse_kib(text: &str) -> u64 {
    text.trim()
        .trim_end_matches("kB")
        .trim()
        .parse::<u64>()
        .map(|kib| kib * 1024)
        .unwrap_or(0)
}
