//! Transport seam between the check primitive and the network

use std::time::Duration;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use crate::error::TransportError;
use super::request::{ApiRequest, ApiResponse, Method};

/// Sends one request and returns the raw response.
///
/// Implementations return `Err` only when no response was obtained; any
/// HTTP status, including 4xx and 5xx, is an `Ok` response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, base_url: &str, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Production transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client {
                message: e.to_string(),
            })?;

        Ok(Self { client, timeout })
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::RequestTimeout {
                duration_ms: timeout_ms(self.timeout),
            }
        } else if err.is_connect() || err.is_request() {
            TransportError::ConnectionFailed {
                message: err.to_string(),
            }
        } else {
            TransportError::InvalidResponse {
                message: err.to_string(),
            }
        }
    }
}

fn timeout_ms(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, base_url: &str, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = request.url(base_url);

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }

        if request.method.carries_body() {
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
        }

        debug!(method = %request.method, url = %url, authenticated = request.token.is_some(), "Sending request");

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError::InvalidResponse {
            message: format!("Failed to read response body: {}", e),
        })?;

        Ok(ApiResponse { status, body })
    }
}
