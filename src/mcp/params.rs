//! Search argument normalization.
//!
//! Converts the loosely-typed `tools/call` argument map into a
//! [`SearchRequest`], applying configured defaults and clamps. Malformed
//! numeric input never fails the request; it degrades to the configured
//! fallback and is logged at debug level.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::McpConfig;
use crate::search::SearchRequest;

/// Builds a normalized search request from a raw argument map.
pub fn build_search_request(arguments: &Map<String, Value>, config: &McpConfig) -> SearchRequest {
    SearchRequest {
        query: arguments.get("q").and_then(value_to_string),
        start: start_position(arguments.get("start"), config),
        page_size: page_size(arguments.get("num"), config),
        offset: offset(arguments.get("offset")),
        sort: arguments.get("sort").and_then(value_to_string),
        fields: string_list_map(arguments.get("fields")),
        conditions: string_list_map(arguments.get("as")),
        languages: languages(arguments.get("lang")),
        extra_queries: extra_queries(arguments.get("ex_q")),
        similar_doc_hash: arguments.get("sdh").and_then(value_to_string),
    }
}

/// Start position: non-negative parsed values pass through; anything else
/// falls back to the configured default start.
fn start_position(value: Option<&Value>, config: &McpConfig) -> u64 {
    match value.and_then(parse_int) {
        Some(start) if start >= 0 => start as u64,
        _ => config.default_start,
    }
}

/// Page size: values within `[1, max_page_size]` pass through; absent,
/// unparsable, or out-of-range values all resolve to the configured maximum.
fn page_size(value: Option<&Value>, config: &McpConfig) -> u32 {
    match value.and_then(parse_int) {
        Some(num) if num > 0 && num <= i64::from(config.max_page_size) => num as u32,
        _ => config.max_page_size,
    }
}

fn offset(value: Option<&Value>) -> i64 {
    value.and_then(parse_int).unwrap_or(0)
}

/// `lang` accepts a single code or an array of codes.
fn languages(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_to_string).collect(),
        Some(single) => value_to_string(single).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Expands a nested string-to-list mapping (the `fields` / `as` shapes)
/// into string arrays. A bare scalar entry becomes a one-element list.
fn string_list_map(value: Option<&Value>) -> HashMap<String, Vec<String>> {
    let Some(Value::Object(map)) = value else {
        return HashMap::new();
    };
    map.iter()
        .map(|(key, entry)| {
            let items = match entry {
                Value::Array(items) => items.iter().filter_map(value_to_string).collect(),
                other => value_to_string(other).into_iter().collect(),
            };
            (key.clone(), items)
        })
        .collect()
}

/// `ex_q` keeps the absent-vs-empty distinction: an absent key is `None`,
/// a present empty list is `Some(vec![])`.
fn extra_queries(value: Option<&Value>) -> Option<Vec<String>> {
    match value {
        Some(Value::Array(items)) => Some(items.iter().filter_map(value_to_string).collect()),
        _ => None,
    }
}

/// Stringifies scalar values; nulls, arrays, and objects yield `None`.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses an integer argument; numbers are truncated, strings go through
/// `str::parse`. Returns `None` on failure.
fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => match s.parse::<i64>() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!(value = %s, error = %e, "failed to parse integer argument");
                None
            }
        },
        other => {
            debug!(value = %other, "non-numeric integer argument");
            None
        }
    }
}
