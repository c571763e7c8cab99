//! Configuration loading and validation for the probe.
//!
//! Gateway credentials come from `SPAY_*` via [`spay::ClientConfig::from_env`];
//! this module only covers what the probe itself needs, read from `PROBE_*`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

const ENV_PREFIX: &str = "PROBE";

/// Gateway call the probe performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// Encrypt and decrypt a fixed payload locally; no network traffic.
    SelfTest,
    ListBanks,
    Balance,
    Statement,
    NameEnquiry,
    InterbankNameEnquiry,
    Inflows,
    AccountInflows,
    SessionInflows,
}

/// Validated probe configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_operation")]
    pub operation: Operation,

    /// Account looked up by the enquiry and inflow operations.
    #[serde(default)]
    pub account: String,

    /// Destination bank for `interbank-name-enquiry`.
    #[serde(default)]
    pub bank_code: String,

    /// NIP session id for `session-inflows`.
    #[serde(default)]
    pub session_id: String,

    /// Day queried by `inflows` and `session-inflows`; today when unset.
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Tracing log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_operation() -> Operation {
    Operation::SelfTest
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load(source: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(source)
            .build()
            .context("failed to build probe configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise probe configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        match self.operation {
            Operation::NameEnquiry | Operation::AccountInflows if self.account.trim().is_empty() => {
                anyhow::bail!("PROBE_ACCOUNT is required for {:?}", self.operation);
            }
            Operation::InterbankNameEnquiry => {
                if self.account.trim().is_empty() {
                    anyhow::bail!("PROBE_ACCOUNT is required for InterbankNameEnquiry");
                }
                if self.bank_code.trim().is_empty() {
                    anyhow::bail!("PROBE_BANK_CODE is required for InterbankNameEnquiry");
                }
            }
            Operation::SessionInflows if self.session_id.trim().is_empty() => {
                anyhow::bail!("PROBE_SESSION_ID is required for SessionInflows");
            }
            _ => {}
        }
        Ok(())
    }
}
