//! First-level classification of a gateway response.
//!
//! Only the HTTP status and, for failures, the gateway's JSON error envelope
//! are inspected here. Endpoint-specific success sentinels are checked later
//! by the orchestrator once the body has been decoded.

use bytes::Bytes;
use common::protocol::ErrorEnvelope;
use common::BusinessError;

use crate::error::SpayError;

/// Result of classifying one exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedOutcome {
    /// 2xx: the raw body, still to be decrypted and/or decoded.
    Success(Bytes),
    /// Non-2xx with a structured error envelope.
    Business(BusinessError),
    /// Non-2xx with an empty body.
    Transport { status: u16, reason: String, body: String },
}

impl ClassifiedOutcome {
    /// Turn a failure outcome into the matching [`SpayError`], passing the
    /// success body through.
    pub fn into_result(self) -> Result<Bytes, SpayError> {
        match self {
            ClassifiedOutcome::Success(body) => Ok(body),
            ClassifiedOutcome::Business(e) => Err(SpayError::Business(e)),
            ClassifiedOutcome::Transport {
                status,
                reason,
                body,
            } => Err(SpayError::Transport {
                status,
                reason,
                body,
            }),
        }
    }
}

/// Classify an HTTP status and raw body.
///
/// # Errors
///
/// Returns [`SpayError::Decode`] when a non-2xx body is present but is not a
/// valid error envelope.
pub fn classify(status: u16, body: Bytes) -> Result<ClassifiedOutcome, SpayError> {
    if (200..=299).contains(&status) {
        return Ok(ClassifiedOutcome::Success(body));
    }

    if body.is_empty() {
        return Ok(ClassifiedOutcome::Transport {
            status,
            reason: status_text(status),
            body: String::new(),
        });
    }

    let envelope: ErrorEnvelope =
        serde_json::from_slice(&body).map_err(SpayError::decode("error envelope"))?;
    Ok(ClassifiedOutcome::Business(envelope.into()))
}

fn status_text(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
        .to_owned()
}
