//! [`SpayClient`]: the operation orchestrator.
//!
//! Every endpoint call follows the same pipeline:
//!
//! 1. Serialise the request to JSON.
//! 2. Encrypt it with the [`SharedSecret`] when the endpoint is confidential.
//! 3. Perform one exchange through the [`Transport`].
//! 4. Classify the status and body ([`crate::classify`]).
//! 5. Decrypt the body when the client is configured for encrypted replies.
//! 6. Decode the body, apply the endpoint's [`SuccessGate`] and return the
//!    typed value.

pub mod endpoint;
pub mod operations;
pub mod transport;

pub use endpoint::{decode_body, Endpoint, SuccessGate, Target};
pub use transport::{ExchangeRequest, ExchangeResponse, HttpTransport, Transport};

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::classify::classify;
use crate::config::ClientConfig;
use crate::crypto::{cipher::pad_len, SharedSecret};
use crate::error::SpayError;

/// Client for the Spay gateway.
///
/// Holds its own immutable configuration, key material and transport, so a
/// single value can be shared (for example behind an `Arc`) by concurrent
/// callers.
#[derive(Debug)]
pub struct SpayClient<T = HttpTransport> {
    config: ClientConfig,
    secret: SharedSecret,
    transport: T,
}

impl SpayClient<HttpTransport> {
    /// Build a client over a fresh [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`SpayError::Config`] for invalid settings, [`SpayError::Format`]
    /// for malformed bit-strings and [`SpayError::Cipher`] for key material of
    /// the wrong length.
    pub fn new(config: ClientConfig) -> Result<Self, SpayError> {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> SpayClient<T> {
    /// Build a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// See [`SpayClient::new`].
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, SpayError> {
        config.validate()?;
        let secret = SharedSecret::from_bit_strings(&config.shared_key, &config.shared_vector)?;
        info!(
            app_id = config.app_id,
            base_url = %config.base_url,
            decrypt_response = config.decrypt_response,
            "spay client initialised"
        );
        Ok(Self {
            config,
            secret,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Encrypt `plaintext` with the client's secret.
    ///
    /// A decrypt-after-encrypt check runs on every call and is logged at
    /// `debug`; its outcome never affects the returned ciphertext.
    pub fn encrypt_payload(&self, plaintext: &[u8]) -> Result<String, SpayError> {
        let ciphertext = self.secret.encrypt(plaintext)?;

        match self.secret.decrypt(&ciphertext) {
            Ok(decrypted) => {
                let pad = pad_len(plaintext.len());
                let intact = decrypted.len() == plaintext.len() + pad
                    && decrypted.starts_with(plaintext)
                    && decrypted[plaintext.len()..].iter().all(|&b| b as usize == pad);
                debug!(
                    plaintext_len = plaintext.len(),
                    ciphertext_len = ciphertext.len(),
                    intact,
                    "envelope self-test"
                );
            }
            Err(e) => debug!(error = %e, "envelope self-test failed"),
        }

        Ok(ciphertext)
    }

    /// Decrypt a base64 payload with the client's secret. Pad bytes are kept.
    pub fn decrypt_payload(&self, payload: &str) -> Result<Vec<u8>, SpayError> {
        Ok(self.secret.decrypt(payload)?)
    }

    /// Run one endpoint call and decode the reply into `Resp`.
    ///
    /// # Errors
    ///
    /// - [`SpayError::Http`] if the exchange fails before a response arrives.
    /// - [`SpayError::Transport`] for a non-2xx status with an empty body.
    /// - [`SpayError::Business`] for a structured gateway error or a failed
    ///   [`SuccessGate`].
    /// - [`SpayError::Decode`] / [`SpayError::Cipher`] for bodies that cannot
    ///   be decrypted or decoded.
    pub async fn execute<Req, Resp>(
        &self,
        endpoint: &Endpoint,
        request: &Req,
    ) -> Result<Resp, SpayError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let plaintext = serde_json::to_vec(request).map_err(SpayError::Encode)?;
        debug!(
            endpoint = endpoint.name,
            body = %String::from_utf8_lossy(&plaintext),
            "request body"
        );

        let body = if endpoint.encrypted {
            self.encrypt_payload(&plaintext)?.into_bytes()
        } else {
            plaintext
        };

        let exchange = self.build_exchange(endpoint, body);
        info!(
            endpoint = endpoint.name,
            method = %exchange.method,
            url = %exchange.url,
            body_len = exchange.body.len(),
            "sending request"
        );

        let response = self.transport.exchange(exchange).await?;
        let status = response.status;
        if (200..=299).contains(&status) {
            info!(endpoint = endpoint.name, status, body_len = response.body.len(), "response received");
            debug!(endpoint = endpoint.name, body = %String::from_utf8_lossy(&response.body), "response body");
        } else {
            error!(
                endpoint = endpoint.name,
                status,
                body = %String::from_utf8_lossy(&response.body),
                "gateway error response"
            );
        }

        let body = classify(status, response.body)?.into_result()?;
        let padded = self.decrypts_reply(endpoint);
        let body = if padded {
            self.decrypt_reply(endpoint, &body)?
        } else {
            body
        };

        let value: Value = decode_body(&body, padded, endpoint.name)?;
        if let Some(gate) = &endpoint.gate {
            if let Err(e) = gate.check(&value) {
                warn!(
                    endpoint = endpoint.name,
                    code = %e.code,
                    message = %e.message,
                    "operation completed without success"
                );
                return Err(e.into());
            }
        }

        serde_json::from_value(value).map_err(SpayError::decode(endpoint.name))
    }

    fn decrypts_reply(&self, endpoint: &Endpoint) -> bool {
        endpoint.encrypted && self.config.decrypt_response
    }

    fn decrypt_reply(&self, endpoint: &Endpoint, body: &[u8]) -> Result<Bytes, SpayError> {
        let decrypted = self.decrypt_payload(&String::from_utf8_lossy(body))?;
        debug!(
            endpoint = endpoint.name,
            body = %String::from_utf8_lossy(&decrypted),
            "decrypted response body"
        );
        Ok(Bytes::from(decrypted))
    }

    fn build_exchange(&self, endpoint: &Endpoint, body: Vec<u8>) -> ExchangeRequest {
        let (base, path, headers) = match endpoint.target {
            Target::Gateway(path) => (
                &self.config.base_url,
                path,
                vec![("AppId", self.config.app_id.to_string())],
            ),
            Target::Requery(path) => (
                &self.config.requery_base_url,
                path,
                vec![("Content-Type", "application/json".to_owned())],
            ),
        };
        ExchangeRequest {
            method: endpoint.method.clone(),
            url: format!("{}{}", base.trim_end_matches('/'), path),
            headers,
            body,
        }
    }
}
