//! NIH RePORTER MCP Server - Entry Point
//!
//! Provides both stdio (for desktop MCP clients) and HTTP transports.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use nih_reporter_mcp::{Config, ReporterClient, logging, server::McpServer};

#[derive(Parser, Debug)]
#[command(name = "nih-reporter-mcp")]
#[command(about = "MCP server for the NIH RePORTER API")]
#[command(version)]
struct Cli {
    /// RePORTER API key (optional; sent as X-Api-Key)
    #[arg(long)]
    api_key: Option<String>,

    /// API base URL (for proxies and mock servers)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Internal retries on transient failures (0 disables)
    #[arg(long)]
    max_retries: Option<u32>,

    /// Append-only log file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Transport mode: stdio or http
    #[arg(long, default_value = "stdio")]
    transport: Transport,

    /// HTTP server port (only used with --transport http)
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write the log file as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// Standard input/output
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST
    Http,
}

impl Cli {
    /// Environment-derived config with command-line flags taking precedence.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::from_env()?;

        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone()).filter(|k| !k.trim().is_empty());
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if let Some(path) = &self.log_file {
            config.log_file.clone_from(path);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.config()?;

    logging::init(&config.log_file, &cli.log_level, cli.json_logs)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cli.transport,
        base_url = %config.base_url,
        has_api_key = config.has_api_key(),
        log_file = %config.log_file.display(),
        "Starting NIH RePORTER MCP server"
    );

    let client = ReporterClient::new(config)?;
    let server = McpServer::new(client);

    match cli.transport {
        Transport::Stdio => {
            server.run_stdio().await?;
        }
        Transport::Http => {
            server.run_http(cli.port).await?;
        }
    }

    Ok(())
}
