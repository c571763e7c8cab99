//! Client configuration.
//!
//! A [`ClientConfig`] is passed by value to [`crate::SpayClient::new`]; there
//! is no process-wide client. [`ClientConfig::from_env`] loads it from
//! `SPAY_*` environment variables.

use serde::Deserialize;

use crate::bitstring::BitString;
use crate::error::SpayError;

/// Environment variable prefix read by [`ClientConfig::from_env`].
pub const ENV_PREFIX: &str = "SPAY";

pub const STAGING_BASE_URL: &str = "https://sbdevzone.sterling.ng/Spay";
pub const PRODUCTION_BASE_URL: &str = "https://webapps.sterling.ng/spay";
pub const DEFAULT_REQUERY_BASE_URL: &str = "https://epayments.sterling.ng";

/// Validated client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Numeric application id sent as the `AppId` header. **Required.**
    pub app_id: i32,

    /// 3DES key as 192 binary digits. **Required.**
    pub shared_key: BitString,

    /// CBC IV as 64 binary digits. **Required.**
    pub shared_vector: BitString,

    /// Origin account debited by transfers. **Required.**
    pub from_account: String,

    /// Gateway base URL; endpoint paths are appended verbatim.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL of the inflow requery service.
    #[serde(default = "default_requery_base_url")]
    pub requery_base_url: String,

    /// Whether gateway responses arrive 3DES-encrypted.
    #[serde(default)]
    pub decrypt_response: bool,

    /// Flat fee reported by [`crate::SpayClient::transfer_cost`].
    #[serde(default = "default_transfer_cost")]
    pub transfer_cost: f64,

    /// Teller id used when a transfer does not name one.
    #[serde(default = "default_teller_id")]
    pub teller_id: String,

    /// `lat,long` sent when a request does not carry its own location.
    #[serde(default = "default_translocation")]
    pub translocation: String,
}

fn default_base_url() -> String {
    STAGING_BASE_URL.into()
}
fn default_requery_base_url() -> String {
    DEFAULT_REQUERY_BASE_URL.into()
}
fn default_transfer_cost() -> f64 {
    10.0
}
fn default_teller_id() -> String {
    "sample-teller-e5dc63e264d29b7578e96bf".into()
}
fn default_translocation() -> String {
    "6.44,3.53".into()
}

impl ClientConfig {
    /// Build a configuration with the required fields and defaults for the rest.
    pub fn new(
        app_id: i32,
        shared_key: BitString,
        shared_vector: BitString,
        from_account: impl Into<String>,
    ) -> Self {
        Self {
            app_id,
            shared_key,
            shared_vector,
            from_account: from_account.into(),
            base_url: default_base_url(),
            requery_base_url: default_requery_base_url(),
            decrypt_response: false,
            transfer_cost: default_transfer_cost(),
            teller_id: default_teller_id(),
            translocation: default_translocation(),
        }
    }

    /// Load and validate configuration from `SPAY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SpayError::Config`] if a required variable is absent, cannot
    /// be parsed, or fails validation.
    pub fn from_env() -> Result<Self, SpayError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load(source: config::Environment) -> Result<Self, SpayError> {
        let cfg = config::Config::builder().add_source(source).build()?;
        let c: ClientConfig = cfg.try_deserialize()?;
        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    ///
    /// Key material is checked separately when the client builds its
    /// [`crate::crypto::SharedSecret`].
    pub fn validate(&self) -> Result<(), SpayError> {
        ensure_url(&self.base_url, "SPAY_BASE_URL")?;
        ensure_url(&self.requery_base_url, "SPAY_REQUERY_BASE_URL")?;
        ensure_non_empty(&self.from_account, "SPAY_FROM_ACCOUNT")?;

        if !self.transfer_cost.is_finite() || self.transfer_cost < 0.0 {
            return Err(SpayError::Config(
                "SPAY_TRANSFER_COST must be a finite, non-negative amount".into(),
            ));
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<(), SpayError> {
    if value.trim().is_empty() {
        return Err(SpayError::Config(format!(
            "{name} is required and must not be empty"
        )));
    }
    Ok(())
}

fn ensure_url(value: &str, name: &str) -> Result<(), SpayError> {
    ensure_non_empty(value, name)?;
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|e| SpayError::Config(format!("{name} is not a valid URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "000000010010001101000101011001111000100110101011110011011110111111111110110111001011101010011000011101100101010000110010000100001000100110101011110011011110111100000001001000110100010101100111";
    const IV: &str = "0001001000110100010101100111100010010000101010111100110111101111";

    fn valid() -> ClientConfig {
        ClientConfig::new(4242, KEY.into(), IV.into(), "0011223344")
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_base_url(), STAGING_BASE_URL);
        assert_eq!(default_requery_base_url(), "https://epayments.sterling.ng");
        assert_eq!(default_transfer_cost(), 10.0);
        assert_eq!(default_teller_id(), "sample-teller-e5dc63e264d29b7578e96bf");
        assert_eq!(default_translocation(), "6.44,3.53");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let cfg = ClientConfig {
            base_url: "".into(),
            ..valid()
        };
        assert!(matches!(cfg.validate(), Err(SpayError::Config(_))));
    }

    #[test]
    fn validate_rejects_relative_base_url() {
        let cfg = ClientConfig {
            base_url: "/Spay".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_from_account() {
        let cfg = ClientConfig {
            from_account: "  ".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_transfer_cost() {
        let cfg = ClientConfig {
            transfer_cost: -1.0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn loads_from_environment_map() {
        let cfg = ClientConfig::load(env(&[
            ("SPAY_APP_ID", "4242"),
            ("SPAY_SHARED_KEY", KEY),
            ("SPAY_SHARED_VECTOR", IV),
            ("SPAY_FROM_ACCOUNT", "0011223344"),
            ("SPAY_DECRYPT_RESPONSE", "true"),
        ]))
        .unwrap();
        assert_eq!(cfg.app_id, 4242);
        assert_eq!(cfg.shared_key, BitString::new(KEY));
        assert!(cfg.decrypt_response);
        assert_eq!(cfg.base_url, STAGING_BASE_URL);
    }

    #[test]
    fn missing_required_variable_is_config_error() {
        let err = ClientConfig::load(env(&[
            ("SPAY_APP_ID", "4242"),
            ("SPAY_SHARED_KEY", KEY),
            ("SPAY_FROM_ACCOUNT", "0011223344"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SpayError::Config(_)));
    }

    #[test]
    fn debug_does_not_leak_key_digits() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains(KEY));
        assert!(!rendered.contains(IV));
    }
}
