//! Business error codes reported by the gateway.

use std::fmt;

use thiserror::Error;

use crate::protocol::ErrorEnvelope;

/// Response code the gateway uses for an overdrawn source account.
pub const INSUFFICIENT_FUNDS_CODE: &str = "x51";

/// Response code the gateway uses when the destination account is blocked.
pub const ACCOUNT_NOT_ALLOWED_CODE: &str = "03x";

/// Known business error codes, matched by exact string against the
/// `response` field of an error envelope.
///
/// Codes outside the registry are kept verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// `"x51"`.
    InsufficientFunds,
    /// `"03x"`.
    AccountNotAllowed,
    /// Any other code string.
    Other(String),
}

impl ErrorCode {
    /// Look up a raw response code in the registry.
    pub fn from_code(code: &str) -> Self {
        match code {
            INSUFFICIENT_FUNDS_CODE => ErrorCode::InsufficientFunds,
            ACCOUNT_NOT_ALLOWED_CODE => ErrorCode::AccountNotAllowed,
            other => ErrorCode::Other(other.to_owned()),
        }
    }

    /// The code exactly as the gateway sends it.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::InsufficientFunds => INSUFFICIENT_FUNDS_CODE,
            ErrorCode::AccountNotAllowed => ACCOUNT_NOT_ALLOWED_CODE,
            ErrorCode::Other(code) => code,
        }
    }

    /// Returns `true` for codes in the closed registry.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ErrorCode::Other(_))
    }

    /// Canonical gateway text for recognised codes.
    pub fn default_message(&self) -> Option<&'static str> {
        match self {
            ErrorCode::InsufficientFunds => Some("Insufficient Funds"),
            ErrorCode::AccountNotAllowed => Some("To Account is not Allowed for this Operation"),
            ErrorCode::Other(_) => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A business-rule failure reported by the gateway.
///
/// Two values are equal when their codes are equal; the message text and
/// status payload do not take part in comparison. Callers branch on
/// [`BusinessError::code`] instead of parsing the rendered message.
#[derive(Debug, Clone, Error)]
#[error("message={message} code={code}")]
pub struct BusinessError {
    pub code: ErrorCode,
    pub message: String,
    /// Raw `data.status` value from the error envelope, if any.
    pub status: Option<serde_json::Value>,
}

impl BusinessError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    pub fn insufficient_funds() -> Self {
        Self::from_code(ErrorCode::InsufficientFunds)
    }

    pub fn account_not_allowed() -> Self {
        Self::from_code(ErrorCode::AccountNotAllowed)
    }

    fn from_code(code: ErrorCode) -> Self {
        let message = code.default_message().unwrap_or_default();
        Self::new(code, message)
    }

    pub fn is_insufficient_funds(&self) -> bool {
        self.code == ErrorCode::InsufficientFunds
    }

    pub fn is_account_not_allowed(&self) -> bool {
        self.code == ErrorCode::AccountNotAllowed
    }
}

impl PartialEq for BusinessError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for BusinessError {}

impl From<ErrorEnvelope> for BusinessError {
    /// `data.ResponseText` is preferred as the message; the top-level
    /// `message` is used when the gateway leaves it blank.
    fn from(envelope: ErrorEnvelope) -> Self {
        let message = if envelope.data.response_text.is_empty() {
            envelope.message
        } else {
            envelope.data.response_text
        };
        Self {
            code: ErrorCode::from_code(&envelope.response),
            message,
            status: envelope.data.status,
        }
    }
}
