//! Error type returned by every fallible client operation.

use common::BusinessError;
use thiserror::Error;

use crate::bitstring::BitStringError;
use crate::crypto::CipherError;

/// Top-level client error.
///
/// Nothing here is retried by the client; every variant is surfaced to the
/// immediate caller.
#[derive(Debug, Error)]
pub enum SpayError {
    /// Key or IV bit-string contains a non-binary digit.
    #[error("malformed bit-string: {0}")]
    Format(#[from] BitStringError),

    /// Invalid key material, malformed base64 or a ciphertext of bad length.
    #[error("3des envelope: {0}")]
    Cipher(#[from] CipherError),

    /// A request body could not be serialised.
    #[error("json encoding: {0}")]
    Encode(#[source] serde_json::Error),

    /// A response body (success payload, error envelope or embedded JSON
    /// string) could not be decoded.
    #[error("json decoding of {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Non-2xx status with an empty body.
    #[error("empty response received: {status} {reason}")]
    Transport {
        status: u16,
        reason: String,
        body: String,
    },

    /// The exchange itself failed (connect, TLS, body read).
    #[error("http exchange failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway rejected the operation with a structured error or a
    /// non-success internal status.
    #[error("gateway rejected request: {0}")]
    Business(#[from] BusinessError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SpayError {
    pub(crate) fn decode(context: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| SpayError::Decode { context, source }
    }

    /// The business error carried by this value, if any.
    pub fn business(&self) -> Option<&BusinessError> {
        match self {
            SpayError::Business(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_insufficient_funds(&self) -> bool {
        self.business().is_some_and(BusinessError::is_insufficient_funds)
    }

    pub fn is_account_not_allowed(&self) -> bool {
        self.business().is_some_and(BusinessError::is_account_not_allowed)
    }
}

impl From<config::ConfigError> for SpayError {
    fn from(error: config::ConfigError) -> Self {
        SpayError::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ErrorCode;

    #[test]
    fn business_helpers_branch_on_code() {
        let e = SpayError::from(BusinessError::new(ErrorCode::InsufficientFunds, "low balance"));
        assert!(e.is_insufficient_funds());
        assert!(!e.is_account_not_allowed());
        assert_eq!(e.business(), Some(&BusinessError::insufficient_funds()));

        let e = SpayError::from(BusinessError::account_not_allowed());
        assert!(e.is_account_not_allowed());
    }

    #[test]
    fn non_business_errors_have_no_code() {
        let e = SpayError::Transport {
            status: 503,
            reason: "Service Unavailable".into(),
            body: String::new(),
        };
        assert!(e.business().is_none());
        assert!(!e.is_insufficient_funds());
        assert_eq!(e.to_string(), "empty response received: 503 Service Unavailable");
    }

    #[test]
    fn display_includes_business_message() {
        let e = SpayError::from(BusinessError::insufficient_funds());
        assert!(e.to_string().contains("message=Insufficient Funds code=x51"));
    }
}
