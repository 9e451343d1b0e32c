//! Tracing subscriber setup for the server and the terminal client.
//!
//! The server logs JSON to stdout. The client owns the terminal, so it writes
//! plain-text logs to a file instead.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SERVER_DEFAULT_FILTER: &str = "bookshelf=debug,tower_http=debug";
const CLIENT_DEFAULT_FILTER: &str = "bookshelf=info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

/// Install the server subscriber (JSON lines on stdout)
pub fn init_server_logging() {
    tracing_subscriber::registry()
        .with(env_filter(SERVER_DEFAULT_FILTER))
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Install the client subscriber, appending to `log_path`
pub fn init_client_logging(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(CLIENT_DEFAULT_FILTER))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
