//! HTTP transport: JSON-RPC over `POST /mcp`, plus a health check.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::protocol::{JsonRpcRequest, SERVER_NAME, handle_request};
use crate::tools::{McpTool, ToolContext};

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub tools: Vec<Box<dyn McpTool>>,
    pub ctx: ToolContext,
}

/// Create the HTTP router for MCP.
pub fn create_router(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> Router {
    let state = Arc::new(HttpState { tools, ctx });

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/mcp", post(handle_mcp_post))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.tools.len()
    }))
}

async fn handle_mcp_post(State(state): State<Arc<HttpState>>, Json(req): Json<JsonRpcRequest>) -> Response {
    tracing::debug!(method = %req.method, "Handling MCP POST request");

    match handle_request(&req, &state.tools, &state.ctx).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
