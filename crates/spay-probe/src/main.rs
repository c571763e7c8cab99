//! `spay-probe` checks that a deployment can talk to the Spay gateway.
//!
//! `PROBE_*` variables pick the call, `SPAY_*` variables carry the gateway
//! credentials. The call's result is printed to stdout as pretty JSON and
//! the process exits non-zero when it fails. Logs go to stderr.

mod config;
mod probe;
mod telemetry;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is not up yet, so a bad PROBE_* setting is reported on stderr.
    let cfg = match config::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("spay-probe: invalid PROBE_* settings: {e:#}");
            return Err(e);
        }
    };

    telemetry::init(&cfg.log_level)?;
    probe::run(&cfg).await
}
