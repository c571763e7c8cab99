//! Per-endpoint call descriptors and second-level success gates.

use common::{BusinessError, ErrorCode};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::crypto::unpadded;
use crate::error::SpayError;

/// Where a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Path under the configured gateway base URL; carries the `AppId` header.
    Gateway(&'static str),
    /// Path under the configured requery base URL; plain JSON, no `AppId`.
    Requery(&'static str),
}

/// Internal status check applied to a decoded 2xx body.
///
/// Many gateway calls answer 200 and report failure inside the payload. The
/// gate compares the string found at `field` (a JSON pointer) with
/// `expected`; on mismatch the string at `message` becomes the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessGate {
    pub field: &'static str,
    pub expected: &'static str,
    pub message: &'static str,
}

impl SuccessGate {
    /// Top-level `response` must equal `expected`; failures carry `message`.
    pub const fn response_code(expected: &'static str) -> Self {
        Self {
            field: "/response",
            expected,
            message: "/message",
        }
    }

    /// Nested `data.status` must equal `expected`.
    pub const fn data_status(expected: &'static str, message: &'static str) -> Self {
        Self {
            field: "/data/status",
            expected,
            message,
        }
    }

    /// # Errors
    ///
    /// Returns a [`BusinessError`] whose code is the value found at
    /// [`SuccessGate::field`] when it differs from the expected sentinel.
    pub fn check(&self, body: &Value) -> Result<(), BusinessError> {
        let found = text_at(body, self.field);
        if found == self.expected {
            return Ok(());
        }
        Err(BusinessError::new(
            ErrorCode::from_code(&found),
            text_at(body, self.message),
        ))
    }
}

/// Describes one gateway operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// Short name used in logs and decode errors.
    pub name: &'static str,
    pub target: Target,
    pub method: Method,
    /// Whether the request body goes through the 3DES envelope.
    pub encrypted: bool,
    pub gate: Option<SuccessGate>,
}

impl Endpoint {
    /// Encrypted POST to the gateway.
    pub const fn gateway(name: &'static str, path: &'static str, gate: SuccessGate) -> Self {
        Self {
            name,
            target: Target::Gateway(path),
            method: Method::POST,
            encrypted: true,
            gate: Some(gate),
        }
    }

    /// Plaintext call to the requery service.
    pub const fn requery(name: &'static str, method: Method, path: &'static str) -> Self {
        Self {
            name,
            target: Target::Requery(path),
            method,
            encrypted: false,
            gate: None,
        }
    }
}

/// Decode a whole response body as JSON.
///
/// A `padded` body comes straight out of [`crate::crypto::decrypt`]; its
/// cipher pad is dropped first when it is well formed. Any other trailing
/// bytes are a [`SpayError::Decode`].
pub fn decode_body<T: DeserializeOwned>(
    body: &[u8],
    padded: bool,
    context: &'static str,
) -> Result<T, SpayError> {
    let json = if padded {
        unpadded(body).unwrap_or(body)
    } else {
        body
    };
    serde_json::from_slice(json).map_err(SpayError::decode(context))
}

fn text_at(body: &Value, pointer: &str) -> String {
    match body.pointer(pointer) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
