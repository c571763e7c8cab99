//! The HTTP exchange seam.
//!
//! [`Transport`] performs exactly one request/response exchange per call:
//! no retries, no internal timeout. [`HttpTransport`] is the production
//! implementation backed by a shared [`reqwest::Client`].

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::Method;

use crate::error::SpayError;

/// A fully-resolved outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRequest {
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl ExchangeRequest {
    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and full body of a completed exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Performs a single request/response exchange.
///
/// Implementations must be stateless per call so one value can serve
/// concurrent callers.
pub trait Transport: Send + Sync {
    fn exchange(
        &self,
        request: ExchangeRequest,
    ) -> impl Future<Output = Result<ExchangeResponse, SpayError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn exchange(
        &self,
        request: ExchangeRequest,
    ) -> impl Future<Output = Result<ExchangeResponse, SpayError>> + Send {
        (**self).exchange(request)
    }
}

/// [`Transport`] over a pooled `reqwest` client.
///
/// No timeout is configured; wrap calls in `tokio::time::timeout` to bound
/// them.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxy, TLS roots, timeouts).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn exchange(&self, request: ExchangeRequest) -> Result<ExchangeResponse, SpayError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(ExchangeResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = ExchangeRequest {
            method: Method::POST,
            url: "https://example.test/api".into(),
            headers: vec![("AppId", "42".into())],
            body: Vec::new(),
        };
        assert_eq!(req.header("appid"), Some("42"));
        assert_eq!(req.header("Content-Type"), None);
    }
}
