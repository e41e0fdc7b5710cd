//! Tests for MCP protocol JSON-RPC handling.
//!
//! These tests drive the shared dispatcher and the stdio loop directly.

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nih_reporter_mcp::client::ReporterClient;
use nih_reporter_mcp::config::Config;
use nih_reporter_mcp::server::protocol::{JsonRpcRequest, handle_request};
use nih_reporter_mcp::server::stdio;
use nih_reporter_mcp::tools::{McpTool, ToolContext, register_all_tools};

fn context(uri: &str) -> ToolContext {
    ToolContext::new(Arc::new(ReporterClient::new(Config::for_testing(uri)).unwrap()))
}

fn request(value: Value) -> JsonRpcRequest {
    serde_json::from_value(value).unwrap()
}

async fn call(ctx: &ToolContext, tools: &[Box<dyn McpTool>], value: Value) -> Value {
    let response = handle_request(&request(value), tools, ctx).await.unwrap();
    serde_json::to_value(response).unwrap()
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_initialize_echoes_protocol_version() {
    let ctx = context("http://127.0.0.1:1");
    let tools = register_all_tools();

    let resp = call(
        &ctx,
        &tools,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2025-03-26"}}),
    )
    .await;

    assert_eq!(resp["id"], 1);
    assert_eq!(resp["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(resp["result"]["serverInfo"]["name"], "nih-reporter-mcp");
    assert!(resp["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_notification_gets_no_response() {
    let ctx = context("http://127.0.0.1:1");
    let tools = register_all_tools();

    let req = request(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));
    assert!(handle_request(&req, &tools, &ctx).await.is_none());
}

#[tokio::test]
async fn test_unknown_method() {
    let ctx = context("http://127.0.0.1:1");
    let tools = register_all_tools();

    let resp = call(&ctx, &tools, json!({"jsonrpc": "2.0", "id": 7, "method": "resources/list"})).await;
    assert_eq!(resp["error"]["code"], -32601);
}

// =============================================================================
// tools/list and tools/call
// =============================================================================

#[tokio::test]
async fn test_tools_list_advertises_four_tools() {
    let ctx = context("http://127.0.0.1:1");
    let tools = register_all_tools();

    let resp = call(&ctx, &tools, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
    let listed = resp["result"]["tools"].as_array().unwrap();

    let names: Vec<&str> = listed.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["search_projects", "search_publications", "search_combined", "test_connection"]);
    for tool in listed {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn test_tools_call_unknown_tool() {
    let ctx = context("http://127.0.0.1:1");
    let tools = register_all_tools();

    let resp = call(
        &ctx,
        &tools,
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {"name": "search_grants"}}),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
}

#[tokio::test]
async fn test_tools_call_validation_error_is_tool_result() {
    let ctx = context("http://127.0.0.1:1");
    let tools = register_all_tools();

    let resp = call(
        &ctx,
        &tools,
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {"name": "search_projects", "arguments": {"org_state": "California"}}
        }),
    )
    .await;

    assert!(resp.get("error").is_none());
    assert_eq!(resp["result"]["isError"], true);
    let body: Value = serde_json::from_str(resp["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["kind"], "validation_error");
    assert_eq!(body["field"], "org_state");
}

#[tokio::test]
async fn test_tools_call_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/projects/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"meta": {"total": 0}, "results": []})),
        )
        .mount(&mock_server)
        .await;

    let ctx = context(&mock_server.uri());
    let tools = register_all_tools();

    let resp = call(
        &ctx,
        &tools,
        json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {"name": "search_projects", "arguments": null}}),
    )
    .await;

    assert_eq!(resp["result"]["isError"], false);
    let body: Value = serde_json::from_str(resp["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(body["total_count"], 0);
    assert_eq!(body["projects"], json!([]));
}

// =============================================================================
// Stdio loop
// =============================================================================

#[tokio::test]
async fn test_stdio_serves_lines_until_eof() {
    let ctx = context("http://127.0.0.1:1");
    let tools = register_all_tools();

    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
        "\n\n",
        "not json\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
    );
    let mut output: Vec<u8> = Vec::new();

    stdio::serve(input.as_bytes(), &mut output, &tools, &ctx).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[1]["error"]["code"], -32700);
    assert_eq!(lines[2]["result"]["tools"].as_array().unwrap().len(), 4);
}
