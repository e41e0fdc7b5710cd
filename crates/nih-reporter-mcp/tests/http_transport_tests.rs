//! HTTP transport tests against a locally bound server.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{Value, json};

use nih_reporter_mcp::client::ReporterClient;
use nih_reporter_mcp::config::Config;
use nih_reporter_mcp::server::http::create_router;
use nih_reporter_mcp::tools::{ToolContext, register_all_tools};

async fn spawn_server() -> SocketAddr {
    let client = ReporterClient::new(Config::for_testing("http://127.0.0.1:1")).unwrap();
    let router = create_router(register_all_tools(), ToolContext::new(Arc::new(client)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_health() {
    let addr = spawn_server().await;

    let body: Value = reqwest::get(format!("http://{addr}/health")).await.unwrap().json().await.unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "nih-reporter-mcp");
    assert_eq!(body["tools"], 4);
}

#[tokio::test]
async fn test_mcp_post_tools_list() {
    let addr = spawn_server().await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/mcp"))
        .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_mcp_post_notification_is_accepted() {
    let addr = spawn_server().await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/mcp"))
        .json(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 202);
}
