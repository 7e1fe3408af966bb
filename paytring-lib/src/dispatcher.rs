//! Request dispatch and response envelope handling.
//!
//! The gateway wraps every response in an envelope:
//!
//! ```json
//! { "status": true,  "data": { ... } }
//! { "status": false, "error": { "message": "Invalid API key" } }
//! ```
//!
//! [`Dispatcher::post`] signs the body, sends it, and unwraps the envelope.
//! [`Dispatcher::get`] sends an unsigned GET and applies the same envelope
//! policy, so both verbs fail the same way on `status: false`.

use std::sync::Arc;
use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ApiSecret, ClientConfig};
use crate::hash::{create_hash, Payload, HASH_FIELD};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::{PaytringError, Result};

/// Message used when the gateway rejects a call without saying why.
pub const UNKNOWN_GATEWAY_ERROR: &str = "unknown gateway error";

const STATUS_FIELD: &str = "status";
const DATA_FIELD: &str = "data";
const BODY_SNIPPET_LEN: usize = 200;

/// Sole mediator between resource clients and the gateway.
pub struct Dispatcher {
    config: ClientConfig,
    secret: ApiSecret,
    headers: HeaderMap,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher over an injected transport.
    pub fn new(
        config: ClientConfig,
        secret: ApiSecret,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        config.validate()?;
        let headers = build_headers(&config)?;
        Ok(Self {
            config,
            secret,
            headers,
            transport,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Digest of `body` under the client's secret.
    pub fn sign(&self, body: &Payload) -> String {
        create_hash(body, self.secret.expose_secret())
    }

    /// Sign `body`, POST it to `endpoint`, and unwrap the envelope.
    ///
    /// `body` must already carry the API key. The hash covers every field of
    /// `body`; any `hash` field the caller left in is replaced. On success
    /// the response body minus its `status` flag is returned.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, body), fields(fields = body.len())))]
    pub async fn post(&self, endpoint: &str, mut body: Payload) -> Result<Payload> {
        body.remove(HASH_FIELD);
        let hash = self.sign(&body);
        body.insert(HASH_FIELD.to_string(), Value::String(hash));
        self.dispatch(Method::POST, endpoint, Some(Value::Object(body)))
            .await
    }

    /// GET `endpoint` and unwrap the envelope.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn get(&self, endpoint: &str) -> Result<Payload> {
        self.dispatch(Method::GET, endpoint, None).await
    }

    /// [`post`](Self::post), then deserialize the envelope's `data`.
    pub async fn post_data<T: DeserializeOwned>(&self, endpoint: &str, body: Payload) -> Result<T> {
        let unwrapped = self.post(endpoint, body).await?;
        extract_data(unwrapped)
    }

    /// [`get`](Self::get), then deserialize the envelope's `data`.
    pub async fn get_data<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let unwrapped = self.get(endpoint).await?;
        extract_data(unwrapped)
    }

    async fn dispatch(&self, method: Method, endpoint: &str, body: Option<Value>) -> Result<Payload> {
        let request = HttpRequest {
            method,
            url: self.config.endpoint_url(endpoint),
            headers: self.headers.clone(),
            body,
        };
        let operation = format!("{} {}", request.method, endpoint);

        #[cfg(feature = "tracing")]
        tracing::debug!(%operation, url = %request.url, "dispatching gateway request");

        let deadline = Duration::from_secs(self.config.timeout_secs);
        let response = tokio::time::timeout(deadline, self.transport.send(request))
            .await
            .map_err(|_| PaytringError::ConnectionTimeout {
                operation: operation.clone(),
                timeout_ms: self.config.timeout_secs * 1000,
            })??;

        #[cfg(feature = "tracing")]
        tracing::debug!(%operation, status = response.status, "gateway responded");

        let result = unwrap_envelope(&response);

        #[cfg(feature = "tracing")]
        if let Err(PaytringError::Gateway(message)) = &result {
            tracing::warn!(%operation, %message, "gateway rejected request");
        }

        result
    }
}

fn build_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for (name, value) in &config.extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            PaytringError::InvalidConfig(format!("invalid header name {:?}: {}", name, e))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            PaytringError::InvalidConfig(format!("invalid value for header {}: {}", name, e))
        })?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Apply the envelope contract to a raw response.
///
/// - `status: false` → [`PaytringError::Gateway`], whatever the HTTP status.
/// - non-2xx, non-JSON, or no boolean `status` → [`PaytringError::Protocol`].
/// - otherwise the body with `status` removed.
pub(crate) fn unwrap_envelope(response: &HttpResponse) -> Result<Payload> {
    let http_status = Some(response.status);

    let parsed: Value = match serde_json::from_slice(&response.body) {
        Ok(value) => value,
        Err(e) => {
            let message = if response.is_success() {
                format!("response is not valid JSON: {}", e)
            } else {
                format!("unexpected response: {}", snippet(&response.text_lossy()))
            };
            return Err(PaytringError::protocol(http_status, message));
        }
    };

    let mut body = match parsed {
        Value::Object(map) => map,
        _ => {
            return Err(PaytringError::protocol(
                http_status,
                "response is not a JSON object",
            ))
        }
    };

    match body.remove(STATUS_FIELD) {
        Some(Value::Bool(false)) => Err(PaytringError::Gateway(gateway_message(&body))),
        Some(Value::Bool(true)) if response.is_success() => Ok(body),
        Some(Value::Bool(true)) => Err(PaytringError::protocol(
            http_status,
            "successful envelope with a non-2xx status",
        )),
        _ if !response.is_success() => Err(PaytringError::protocol(
            http_status,
            format!("unexpected response: {}", snippet(&response.text_lossy())),
        )),
        _ => Err(PaytringError::protocol(
            http_status,
            "response envelope has no boolean status",
        )),
    }
}

fn gateway_message(body: &Payload) -> String {
    body.get("error")
        .and_then(|error| match error {
            Value::Object(fields) => fields.get("message").and_then(Value::as_str),
            Value::String(message) => Some(message.as_str()),
            _ => None,
        })
        .filter(|message| !message.is_empty())
        .unwrap_or(UNKNOWN_GATEWAY_ERROR)
        .to_string()
}

/// Deserialize `data` from an unwrapped envelope.
///
/// Envelopes without a `data` member are deserialized as a whole.
pub(crate) fn extract_data<T: DeserializeOwned>(mut unwrapped: Payload) -> Result<T> {
    let value = match unwrapped.remove(DATA_FIELD) {
        Some(data) => data,
        None => Value::Object(unwrapped),
    };
    serde_json::from_value(value).map_err(|e| {
        PaytringError::protocol(None, format!("unexpected response data: {}", e))
    })
}

fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::verify_hash;
    use crate::test_utils::{error_envelope, success_envelope, MockTransport, TestFixtures};
    use serde::Deserialize;
    use serde_json::json;

    fn dispatcher(mock: &Arc<MockTransport>) -> Dispatcher {
        let config = ClientConfig::new("https://gateway.test").with_header("x-client", "tests");
        Dispatcher::new(config, ApiSecret::new(TestFixtures::API_SECRET), mock.clone()).unwrap()
    }

    fn body(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_post_signs_body() {
        let mock = MockTransport::new();
        mock.push_json(200, success_envelope(json!({"valid": true})));
        let dispatcher = dispatcher(&mock);

        let unwrapped = dispatcher
            .post("upi/validate", body(json!({"key": "test_api_key", "vpa": "test@upi"})))
            .await
            .unwrap();
        assert_eq!(unwrapped.get("data"), Some(&json!({"valid": true})));
        assert!(!unwrapped.contains_key("status"));

        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://gateway.test/api/v1/upi/validate");
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.headers["x-client"], "tests");

        let mut sent = body(request.body.unwrap());
        let hash = sent.remove(HASH_FIELD).unwrap();
        assert_eq!(
            hash,
            json!("1ac98b66208d06c53777fadf536c2e53cf66dd1550cb190872b79d5d92e2c2babb49d7750a802274d13dacfe2b84a1d1ca2989dc13fecb95a2ea142732f5aa36")
        );
        assert!(verify_hash(&sent, TestFixtures::API_SECRET, hash.as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_post_replaces_stale_hash() {
        let mock = MockTransport::new();
        mock.push_json(200, success_envelope(json!({})));
        let dispatcher = dispatcher(&mock);

        dispatcher
            .post("upi/validate", body(json!({"key": "k", "vpa": "v", "hash": "stale"})))
            .await
            .unwrap();

        let mut sent = body(mock.last_request().unwrap().body.unwrap());
        let hash = sent.remove(HASH_FIELD).unwrap();
        assert_ne!(hash, json!("stale"));
        assert_eq!(hash, json!(dispatcher.sign(&sent)));
    }

    #[tokio::test]
    async fn test_post_gateway_error() {
        let mock = MockTransport::new();
        mock.push_json(200, error_envelope("Invalid API key"));
        let dispatcher = dispatcher(&mock);

        let err = dispatcher
            .post("order/create", body(json!({"key": "bad"})))
            .await
            .unwrap_err();
        assert!(matches!(&err, PaytringError::Gateway(msg) if msg == "Invalid API key"));
    }

    #[tokio::test]
    async fn test_gateway_error_on_non_2xx_keeps_message() {
        let mock = MockTransport::new();
        mock.push_json(401, error_envelope("Invalid API key"));
        let dispatcher = dispatcher(&mock);

        let err = dispatcher.get("order/fetch/1").await.unwrap_err();
        assert_eq!(err.gateway_message(), Some("Invalid API key"));
    }

    #[tokio::test]
    async fn test_gateway_error_without_message() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"status": false}));
        let dispatcher = dispatcher(&mock);

        let err = dispatcher.get("order/fetch/1").await.unwrap_err();
        assert_eq!(err.gateway_message(), Some(UNKNOWN_GATEWAY_ERROR));
    }

    #[tokio::test]
    async fn test_get_applies_envelope() {
        let mock = MockTransport::new();
        mock.push_json(200, success_envelope(json!({"id": "ord_1"})));
        let dispatcher = dispatcher(&mock);

        let unwrapped = dispatcher.get("order/fetch/ord_1").await.unwrap();
        assert_eq!(unwrapped.get("data"), Some(&json!({"id": "ord_1"})));

        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::GET);
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_non_json_error_page_is_protocol_error() {
        let mock = MockTransport::new();
        mock.push_raw(502, "<html>Bad Gateway</html>");
        let dispatcher = dispatcher(&mock);

        let err = dispatcher.get("order/fetch/1").await.unwrap_err();
        match err {
            PaytringError::Protocol { status, message } => {
                assert_eq!(status, Some(502));
                assert!(message.contains("Bad Gateway"));
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_is_protocol_error() {
        let mock = MockTransport::new();
        mock.push_raw(200, "not json");
        mock.push_json(200, json!(["status", true]));
        mock.push_json(200, json!({"data": {}}));
        mock.push_json(500, json!({"status": true}));
        let dispatcher = dispatcher(&mock);

        for _ in 0..4 {
            let err = dispatcher.get("order/fetch/1").await.unwrap_err();
            assert!(err.is_protocol(), "unexpected error: {:?}", err);
        }
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let mock = MockTransport::new();
        mock.push_error(PaytringError::ConnectionFailed {
            target: "https://gateway.test".to_string(),
            reason: "connection refused".to_string(),
        });
        let dispatcher = dispatcher(&mock);

        let err = dispatcher.get("order/fetch/1").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Validity {
        valid: bool,
    }

    #[tokio::test]
    async fn test_post_data_typed() {
        let mock = MockTransport::new();
        mock.push_json(200, success_envelope(json!({"valid": false})));
        mock.push_json(200, success_envelope(json!({"unexpected": 1})));
        let dispatcher = dispatcher(&mock);

        let validity: Validity = dispatcher
            .post_data("upi/validate", Payload::new())
            .await
            .unwrap();
        assert_eq!(validity, Validity { valid: false });

        let err = dispatcher
            .post_data::<Validity>("upi/validate", Payload::new())
            .await
            .unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_extract_data_without_data_member() {
        let unwrapped = body(json!({"valid": true}));
        let validity: Validity = extract_data(unwrapped).unwrap();
        assert!(validity.valid);
    }

    #[test]
    fn test_invalid_extra_header_rejected() {
        let mock = MockTransport::new();
        let config = ClientConfig::default().with_header("bad header", "x");
        let err = Dispatcher::new(config, ApiSecret::new("s"), mock).unwrap_err();
        assert!(matches!(err, PaytringError::InvalidConfig(_)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let mock = MockTransport::new();
        let dispatcher = dispatcher(&mock);
        let rendered = format!("{:?}", dispatcher);
        assert!(!rendered.contains(TestFixtures::API_SECRET));
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(500);
        let cut = snippet(&long);
        assert_eq!(cut.len(), BODY_SNIPPET_LEN + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(snippet("  short  "), "short");
    }
}
