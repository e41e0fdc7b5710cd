//! Stdio transport for MCP protocol.
//!
//! Handles newline-delimited JSON-RPC 2.0 over stdin/stdout. Stdout carries
//! protocol messages only; logs go to the log file and stderr.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::protocol::{JsonRpcRequest, JsonRpcResponse, codes, handle_request};
use crate::tools::{McpTool, ToolContext};

/// Handle MCP protocol over the process stdin/stdout.
pub async fn run_stdio(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> anyhow::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve(reader, writer, &tools, &ctx).await
}

/// Serve requests from `reader` until EOF, writing one response line per request.
pub async fn serve<R, W>(
    mut reader: R,
    mut writer: W,
    tools: &[Box<dyn McpTool>],
    ctx: &ToolContext,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    tracing::info!("MCP stdio server ready, waiting for requests...");

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            tracing::info!("Stdin closed, shutting down");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
            Ok(request) => {
                tracing::debug!(method = %request.method, "Received request");
                handle_request(&request, tools, ctx).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable request line");
                Some(JsonRpcResponse::error(None, codes::PARSE_ERROR, format!("Parse error: {e}")))
            }
        };

        if let Some(response) = response {
            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}
