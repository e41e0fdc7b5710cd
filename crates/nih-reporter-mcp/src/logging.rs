//! Tracing subscriber setup.
//!
//! Logs go to an append-only file and to stderr. Stdout is reserved for the
//! stdio transport.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the process-wide subscriber. Call once, before anything logs.
///
/// `RUST_LOG` directives win over `log_level` when set.
///
/// # Errors
///
/// Returns error if the log file cannot be opened or a subscriber is already set.
pub fn init(log_file: &Path, log_level: &str, json: bool) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("cannot open log file {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false).compact();
    let file_layer = fmt::layer().with_writer(Mutex::new(file)).with_ansi(false);

    let registry = tracing_subscriber::registry().with(filter).with(stderr_layer);

    if json {
        registry.with(file_layer.json()).try_init()?;
    } else {
        registry.with(file_layer).try_init()?;
    }

    Ok(())
}
