//! `reqwest`-backed transport.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{HttpRequest, HttpResponse, HttpTransport};
use crate::config::ClientConfig;
use crate::{PaytringError, Result};

/// Production transport built on a pooled `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    /// Build a client honoring the configured timeout and User-Agent.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| {
                PaytringError::InvalidConfig(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Wrap an existing client, e.g. one shared with the rest of an application.
    pub fn from_client(client: reqwest::Client, timeout_secs: u64) -> Self {
        Self {
            client,
            timeout_secs,
        }
    }

    /// Map reqwest errors to PaytringError.
    fn map_reqwest_error(&self, operation: &str, url: &str, e: reqwest::Error) -> PaytringError {
        if e.is_timeout() {
            PaytringError::ConnectionTimeout {
                operation: operation.to_string(),
                timeout_ms: self.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            PaytringError::ConnectionFailed {
                target: url.to_string(),
                reason: e.to_string(),
            }
        } else {
            PaytringError::Transport(format!("{} failed: {}", operation, e))
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let operation = format!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(&operation, &request.url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(&operation, &request.url, e))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
