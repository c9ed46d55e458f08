//! Logging setup for the `oneid` binary.
//!
//! Ids go to stdout, so diagnostics are written to stderr. Filtering follows
//! `RUST_LOG` and defaults to `info`; `RUST_LOG=oneid=debug` shows layout
//! corrections and sequence exhaustion.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global `tracing-subscriber` fmt subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
