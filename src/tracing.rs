//! Tracing setup for the gapstore binary
//!
//! The library only emits events; installing a subscriber is left to hosts.
//! The bundled binary uses [`init`].
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - buffer lifecycle, sequence commits, undo/redo
//! - `RUST_LOG=gapstore::history=trace` - every recorded operation
//! - `RUST_LOG=gapstore::buffer=trace` - gap buffer growth
//!
//! # Log Files
//!
//! Logs are written to `~/.config/gapstore/logs/gapstore.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize tracing subscriber with console and (optionally) file logging
///
/// Console output goes to stderr so it never mixes with buffer contents
/// printed on stdout.
pub fn init(log_to_file: bool) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = if log_to_file {
        match crate::config_paths::ensure_logs_dir() {
            Ok(logs_dir) => {
                let file_appender = tracing_appender::rolling::daily(logs_dir, "gapstore.log");
                Some(
                    fmt::layer()
                        .with_writer(file_appender)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true)
                        .with_filter(EnvFilter::new("debug")),
                )
            }
            Err(e) => {
                eprintln!("Warning: Could not initialize file logging: {}", e);
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
