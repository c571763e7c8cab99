//! Log output for the probe.
//!
//! Records are JSON lines on stderr so stdout carries nothing but the
//! operation result and can be piped into `jq`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `level` is a filter directive such as `info` or `spay=debug`; a
/// `RUST_LOG` variable takes precedence over it. Fails if a subscriber is
/// already installed.
pub fn init(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("invalid PROBE_LOG_LEVEL {level:?}: {e}"))?,
    };

    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow!("probe logging already initialised: {e}"))
}
