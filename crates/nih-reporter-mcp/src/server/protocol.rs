//! JSON-RPC 2.0 message types and MCP method dispatch.
//!
//! Shared by the stdio and HTTP transports.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::tools::{McpTool, ToolContext};

/// Protocol version answered when the client does not send one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported in `initialize`.
pub const SERVER_NAME: &str = "nih-reporter-mcp";

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// Notifications carry no id and get no response.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Standard JSON-RPC error codes.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
}

impl JsonRpcResponse {
    /// JSON-RPC version constant.
    const VERSION: &'static str = "2.0";

    #[must_use]
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: Some(result),
            error: None,
            id,
        }
    }

    #[must_use]
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: None,
            error: Some(JsonRpcError { code, message: message.into(), data: None }),
            id,
        }
    }
}

/// MCP tool info for tools/list response.
#[derive(Debug, Serialize)]
pub struct McpToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Dispatch one request. Returns `None` for notifications.
pub async fn handle_request(
    req: &JsonRpcRequest,
    tools: &[Box<dyn McpTool>],
    ctx: &ToolContext,
) -> Option<JsonRpcResponse> {
    if req.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::error(
            req.id.clone(),
            codes::INVALID_REQUEST,
            format!("Unsupported jsonrpc version: {}", req.jsonrpc),
        ));
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(req.id.clone(), &req.params),
        "initialized" | "notifications/initialized" => {
            tracing::debug!("Client initialized");
            JsonRpcResponse::success(req.id.clone(), json!({}))
        }
        "tools/list" => handle_tools_list(req.id.clone(), tools),
        "tools/call" => handle_tools_call(req.id.clone(), &req.params, tools, ctx).await,
        "ping" => JsonRpcResponse::success(req.id.clone(), json!({})),
        _ => JsonRpcResponse::error(
            req.id.clone(),
            codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    if req.is_notification() { None } else { Some(response) }
}

fn handle_initialize(id: Option<Value>, params: &Value) -> JsonRpcResponse {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    tracing::info!("MCP initialize: protocol version {}", protocol_version);

    JsonRpcResponse::success(
        id,
        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

fn handle_tools_list(id: Option<Value>, tools: &[Box<dyn McpTool>]) -> JsonRpcResponse {
    let tool_list: Vec<McpToolInfo> = tools
        .iter()
        .map(|t| McpToolInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
            input_schema: t.input_schema(),
        })
        .collect();

    JsonRpcResponse::success(id, json!({ "tools": tool_list }))
}

async fn handle_tools_call(
    id: Option<Value>,
    params: &Value,
    tools: &[Box<dyn McpTool>],
    ctx: &ToolContext,
) -> JsonRpcResponse {
    let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
        return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'name' parameter");
    };

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => json!({}),
        Some(args) => args.clone(),
    };

    let Some(tool) = tools.iter().find(|t| t.name() == tool_name) else {
        return JsonRpcResponse::error(id, codes::INVALID_PARAMS, format!("Tool not found: {tool_name}"));
    };

    tracing::debug!(tool = %tool_name, "Executing tool");

    match tool.execute(ctx, arguments.clone()).await {
        Ok(text) => JsonRpcResponse::success(id, tool_content(text, false)),
        Err(e) => {
            tracing::error!(
                tool = %tool_name,
                arguments = %arguments,
                kind = e.kind(),
                error = %e,
                "Tool execution failed"
            );
            let body = serde_json::to_string_pretty(&e.to_json()).unwrap_or_else(|_| e.to_user_message());
            JsonRpcResponse::success(id, tool_content(body, true))
        }
    }
}

/// MCP `tools/call` result with a single text item.
fn tool_content(text: String, is_error: bool) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": text
        }],
        "isError": is_error
    })
}
