//! Tracing subscriber setup for the `skp` binary
//!
//! Log lines go to stderr so command output on stdout stays machine-readable.
//! `RUST_LOG` takes precedence over the verbosity flag.

use tracing_subscriber::EnvFilter;

use crate::error::{AdminError, AdminResult};

/// Default filter for a `-v` count: 0 = warn, 1 = info, 2+ = debug
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber
pub fn init(verbosity: u8) -> AdminResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| AdminError::Config(format!("Failed to initialize logging: {}", e)))
}
