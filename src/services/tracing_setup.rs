//! Tracing subscriber setup
//!
//! The terminal belongs to the TUI, so all diagnostics go to a log file.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber writing to `log_file_path`.
///
/// `RUST_LOG` is honoured on top of a DEBUG default. Returns false if the log
/// file could not be created or a subscriber was already installed.
pub fn init_global(log_file_path: &Path) -> bool {
    let Ok(log_file) = File::create(log_file_path) else {
        return false;
    };

    build_subscriber(log_file).try_init().is_ok()
}

/// Build a subscriber with file logging.
///
/// Shared between production and tests.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(tracing::Level::DEBUG.into())
        // ureq and rustls are chatty at debug level
        .add_directive("ureq=info".parse().unwrap_or_else(|_| tracing::Level::INFO.into()))
        .add_directive("rustls=info".parse().unwrap_or_else(|_| tracing::Level::INFO.into()));

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
