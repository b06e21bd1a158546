use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use fess_mcp::config::McpConfig;
use fess_mcp::errors::{FessMcpError, Result};
use fess_mcp::mcp::McpServer;
use fess_mcp::search::{
    DocValue, Document, IndexStats, MemorySnapshot, SearchBackend, SearchRequest, SearchResult,
};

/// Backend stub that returns canned documents and records the last request.
struct StubBackend {
    documents: Vec<Document>,
    fail: bool,
    last_request: Mutex<Option<SearchRequest>>,
}

impl StubBackend {
    fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            fail: false,
            last_request: Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            documents: vec![],
            fail: true,
            last_request: Mutex::new(None),
        }
    }
}

impl SearchBackend for StubBackend {
    fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        if self.fail {
            return Err(FessMcpError::Search {
                message: "search engine down".to_string(),
                query: request.query.clone().unwrap_or_default(),
            });
        }
        Ok(SearchResult {
            query: request.query.clone().unwrap_or_default(),
            query_id: Some("qid-1".to_string()),
            exec_time: 0.02,
            page_size: request.page_size,
            page_number: 1,
            record_count: self.documents.len() as u64,
            page_count: 1,
            documents: self.documents.clone(),
            facets: None,
        })
    }

    fn index_stats(&self) -> Result<IndexStats> {
        if self.fail {
            return Err(FessMcpError::Stats {
                message: "stats unavailable".to_string(),
            });
        }
        Ok(IndexStats {
            document_count: 4242,
            server_name: "stub-fess".to_string(),
            memory: MemorySnapshot {
                rss_bytes: 2048,
                vm_size_bytes: 8192,
            },
        })
    }
}

fn doc(title: &str, url: &str, content: &str) -> Document {
    let mut map = Document::new();
    map.insert("title".to_string(), DocValue::Text(title.to_string()));
    map.insert("url".to_string(), DocValue::Text(url.to_string()));
    map.insert("content".to_string(), DocValue::Text(content.to_string()));
    map
}

fn server_with(backend: StubBackend) -> (McpServer, Arc<StubBackend>) {
    let backend = Arc::new(backend);
    let server = McpServer::new(backend.clone(), McpConfig::default());
    (server, backend)
}

fn server() -> McpServer {
    let docs = vec![
        doc("Doc One", "http://example.com/1", "first body"),
        doc("Doc Two", "http://example.com/2", "second body"),
    ];
    server_with(StubBackend::new(docs)).0
}

fn dispatch(server: &McpServer, request: Value) -> Value {
    let raw = serde_json::to_string(&request).unwrap();
    let response = server.handle_message(&raw).expect("expected a response");
    serde_json::from_str(&response).unwrap()
}

#[test]
fn test_invalid_jsonrpc_version() {
    let response = dispatch(
        &server(),
        json!({"jsonrpc": "1.0", "id": 1, "method": "tools/list"}),
    );
    assert_eq!(response["error"]["code"], -32600);
    assert_eq!(response["jsonrpc"], "2.0");
}

#[test]
fn test_missing_method_rejected_before_routing() {
    let response = dispatch(&server(), json!({"jsonrpc": "2.0", "id": 1, "params": {}}));
    assert_eq!(response["error"]["code"], -32600);
}

#[test]
fn test_unknown_method_names_method() {
    let response = dispatch(
        &server(),
        json!({"jsonrpc": "2.0", "id": 1, "method": "admin/reindex"}),
    );
    assert_eq!(response["error"]["code"], -32601);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("admin/reindex"));
}

#[test]
fn test_parse_failure_is_internal_error_with_null_id() {
    let response = server().handle_message("{broken").unwrap();
    let response: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["error"]["code"], -32603);
    assert!(response["id"].is_null());
}

#[test]
fn test_initialize_capabilities() {
    let response = dispatch(
        &server(),
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
    );
    let result = &response["result"];
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["capabilities"]["resources"].is_object());
    assert!(result["capabilities"]["prompts"].is_object());
    assert_eq!(result["serverInfo"]["name"], "fess-mcp-server");
}

#[test]
fn test_tools_list_catalog() {
    let response = dispatch(
        &server(),
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
    );
    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["name"], "search");
    assert_eq!(tools[1]["name"], "get_index_stats");
    assert_eq!(tools[0]["inputSchema"]["type"], "object");
}

#[test]
fn test_tools_call_without_arguments_key() {
    let response = dispatch(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "search"}
        }),
    );
    assert_eq!(response["error"]["code"], -32602);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("arguments"));
}

#[test]
fn test_tools_call_with_null_arguments_accepted() {
    let response = dispatch(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "search", "arguments": null}
        }),
    );
    assert!(response["error"].is_null());
    assert!(response["result"]["content"].is_array());
}

#[test]
fn test_search_one_content_block_per_hit() {
    let (server, _) = server_with(StubBackend::new(vec![
        doc("A", "http://a", "aa"),
        doc("B", "http://b", "bb"),
        doc("C", "http://c", "cc"),
    ]));
    let response = dispatch(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "search", "arguments": {"q": "report"}}
        }),
    );

    let content = response["result"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 3);
    for block in content {
        assert_eq!(block["type"], "text");
        assert!(block["text"].is_string());
    }
    assert!(content[0]["text"].as_str().unwrap().contains("**Title**: A"));
}

#[test]
fn test_unparsable_num_falls_back_to_maximum() {
    let (server, backend) = server_with(StubBackend::new(vec![doc("A", "http://a", "aa")]));
    let response = dispatch(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "search", "arguments": {"q": "report", "num": "abc"}}
        }),
    );

    assert_eq!(response["result"]["content"].as_array().unwrap().len(), 1);
    let request = backend.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.page_size, McpConfig::default().max_page_size);
}

#[test]
fn test_negative_start_falls_back_to_default() {
    let (server, backend) = server_with(StubBackend::new(vec![]));
    dispatch(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "search", "arguments": {"q": "x", "start": -7, "num": 10}}
        }),
    );

    let request = backend.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.start, McpConfig::default().default_start);
    assert_eq!(request.page_size, 10);
}

#[test]
fn test_unknown_tool() {
    let response = dispatch(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "delete_index", "arguments": {}}
        }),
    );
    assert_eq!(response["error"]["code"], -32602);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Unknown tool: delete_index"));
}

#[test]
fn test_backend_failure_reported_as_internal_error() {
    let (server, _) = server_with(StubBackend::failing());
    let response = dispatch(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "search", "arguments": {"q": "x"}}
        }),
    );
    assert_eq!(response["error"]["code"], -32603);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("search engine down"));
}

#[test]
fn test_get_index_stats_tool() {
    let response = dispatch(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "get_index_stats", "arguments": {}}
        }),
    );

    let content = response["result"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    let payload: Value = serde_json::from_str(content[0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(payload["document_count"], 4242);
    assert_eq!(payload["server_name"], "stub-fess");
    assert_eq!(
        payload["max_page_size"],
        McpConfig::default().max_page_size
    );
    assert_eq!(payload["memory"]["rss_bytes"], 2048);
}

#[test]
fn test_resources_list_catalog() {
    let response = dispatch(
        &server(),
        json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}),
    );
    let resources = response["result"]["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["uri"], "fess://index/stats");
    assert_eq!(resources[0]["name"], "Index Statistics");
    assert_eq!(resources[0]["mimeType"], "application/json");
}

#[test]
fn test_resources_read_index_stats() {
    let response = dispatch(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "resources/read",
            "params": {"uri": "fess://index/stats"}
        }),
    );
    let contents = response["result"]["contents"].as_array().unwrap();
    assert_eq!(contents[0]["uri"], "fess://index/stats");
    assert_eq!(contents[0]["mimeType"], "application/json");
    let payload: Value = serde_json::from_str(contents[0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(payload["document_count"], 4242);
}

#[test]
fn test_resources_read_unknown_uri() {
    let response = dispatch(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "resources/read",
            "params": {"uri": "fess://unknown"}
        }),
    );
    assert_eq!(response["error"]["code"], -32602);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Unknown resource"));
}

#[test]
fn test_prompts_list_catalog() {
    let response = dispatch(
        &server(),
        json!({"jsonrpc": "2.0", "id": 1, "method": "prompts/list"}),
    );
    let prompts = response["result"]["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0]["name"], "basic_search");
    assert_eq!(prompts[1]["name"], "advanced_search");
    assert_eq!(prompts[1]["arguments"].as_array().unwrap().len(), 3);
}

#[test]
fn test_prompts_get_basic_search() {
    let response = dispatch(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "prompts/get",
            "params": {"name": "basic_search", "arguments": {"query": "install guide"}}
        }),
    );
    let messages = response["result"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(
        messages[0]["content"]["text"],
        "Please search for: install guide"
    );
}

#[test]
fn test_prompts_get_advanced_search_suppresses_empty_optionals() {
    let response = dispatch(
        &server(),
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "prompts/get",
            "params": {
                "name": "advanced_search",
                "arguments": {"query": "x", "sort": "", "num": ""}
            }
        }),
    );
    let text = response["result"]["messages"][0]["content"]["text"]
        .as_str()
        .unwrap();
    assert!(text.contains("Query: x"));
    assert!(!text.contains("Sort:"));
    assert!(!text.contains("Number of results:"));
}

#[test]
fn test_id_echoed_verbatim() {
    let response = dispatch(
        &server(),
        json!({"jsonrpc": "2.0", "id": "req-42", "method": "tools/list"}),
    );
    assert_eq!(response["id"], "req-42");

    let response = dispatch(
        &server(),
        json!({"jsonrpc": "2.0", "id": null, "method": "tools/list"}),
    );
    assert!(response["id"].is_null());
}

#[test]
fn test_notifications_produce_no_response() {
    let server = server();
    assert!(server
        .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .is_none());
}

#[test]
fn test_every_response_is_well_formed() {
    let server = server();
    let requests = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"nope"}"#,
        r#"{"jsonrpc":"1.1","id":3,"method":"tools/list"}"#,
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{}}"#,
        "not even json",
    ];

    for raw in requests {
        let response = server.handle_message(raw).expect("response expected");
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        let has_result = !value["result"].is_null();
        let has_error = !value["error"].is_null();
        assert!(has_result ^ has_error, "request: {}", raw);
    }
}
