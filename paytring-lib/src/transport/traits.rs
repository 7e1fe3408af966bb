use async_trait::async_trait;
use http::{HeaderMap, Method};
use serde_json::Value;

use crate::Result;

/// A request ready to go on the wire.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    pub headers: HeaderMap,
    /// JSON body, already signed when the method is POST.
    pub body: Option<Value>,
}

/// Raw response handed back by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends a single HTTP request. One attempt, no retries.
///
/// Implementations report failures to reach the server as
/// [`PaytringError::Transport`](crate::PaytringError::Transport),
/// [`ConnectionFailed`](crate::PaytringError::ConnectionFailed) or
/// [`ConnectionTimeout`](crate::PaytringError::ConnectionTimeout).
/// Any HTTP status, including 4xx and 5xx, is a successful send.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
