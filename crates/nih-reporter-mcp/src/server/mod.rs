//! MCP server implementation.
//!
//! Provides both stdio (for desktop MCP clients) and HTTP transports over the
//! same JSON-RPC dispatch in [`protocol`].

pub mod http;
pub mod protocol;
pub mod stdio;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::client::ReporterClient;
use crate::tools::{self, McpTool, ToolContext};

/// MCP server for NIH RePORTER.
pub struct McpServer {
    /// Tool execution context.
    ctx: ToolContext,

    /// Registered tools.
    tools: Vec<Box<dyn McpTool>>,
}

impl McpServer {
    /// Create a new MCP server.
    #[must_use]
    pub fn new(client: ReporterClient) -> Self {
        let ctx = ToolContext::new(Arc::new(client));
        let tools = tools::register_all_tools();

        Self { ctx, tools }
    }

    /// Run the server in stdio mode.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        tracing::info!("Starting MCP server in stdio mode");
        tracing::info!("Registered {} tools", self.tools.len());

        stdio::run_stdio(self.tools, self.ctx).await
    }

    /// Run the server in HTTP mode.
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be bound or the server fails.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        tracing::info!("Starting MCP server in HTTP mode on port {}", port);
        tracing::info!("Registered {} tools", self.tools.len());

        let router = http::create_router(self.tools, self.ctx);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server listening on http://{}", addr);

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer").field("tools", &self.tools.len()).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
