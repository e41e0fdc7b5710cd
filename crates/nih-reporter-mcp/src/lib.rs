//! NIH RePORTER MCP Server
//!
//! A Model Context Protocol (MCP) server for the NIH RePORTER v2 API.
//! Lets LLM agents search NIH-funded research projects and the publications
//! linked to them.
//!
//! # Features
//!
//! - **4 MCP Tools**: project search, publication search, combined search, connection test
//! - **Typed criteria**: tool arguments are validated before any request is sent
//! - **Stable output**: records always carry every field, missing values as `null`
//! - **Async-first**: built on Tokio; combined search runs independent calls concurrently
//!
//! # Example
//!
//! ```no_run
//! use nih_reporter_mcp::{client::ReporterClient, config::Config, models::{Pagination, SearchCriteria}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = ReporterClient::new(config)?;
//!
//!     let page = client
//!         .search_projects(&SearchCriteria::default(), Pagination::default(), false)
//!         .await?;
//!     println!("{} matching projects", page.total_count);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod request;
pub mod server;
pub mod tools;

pub use client::ReporterClient;
pub use config::Config;
pub use error::{ClientError, ToolError};
