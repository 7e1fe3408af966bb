//! UPI helpers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{require_non_empty, with_key};
use crate::dispatcher::Dispatcher;
use crate::hash::Payload;
use crate::Result;

/// Outcome of a VPA lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpaValidation {
    pub valid: bool,
    /// Account holder name, present when the VPA resolves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// VPA endpoints, reached as `paytring.upi().vpa()`.
#[derive(Clone, Debug)]
pub struct VpaClient {
    dispatcher: Arc<Dispatcher>,
    api_key: String,
}

impl VpaClient {
    pub const VALIDATE_ENDPOINT: &'static str = "upi/validate";

    pub fn new(dispatcher: Arc<Dispatcher>, api_key: impl Into<String>) -> Self {
        Self {
            dispatcher,
            api_key: api_key.into(),
        }
    }

    /// Check that a VPA exists and resolve its holder's name.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn validate(&self, vpa: &str) -> Result<VpaValidation> {
        require_non_empty("vpa", vpa)?;
        let mut payload = Payload::new();
        payload.insert("vpa".to_string(), Value::String(vpa.trim().to_string()));
        self.dispatcher
            .post_data(Self::VALIDATE_ENDPOINT, with_key(payload, &self.api_key))
            .await
    }
}

/// UPI namespace.
#[derive(Clone, Debug)]
pub struct UpiClient {
    vpa: VpaClient,
}

impl UpiClient {
    pub fn new(dispatcher: Arc<Dispatcher>, api_key: impl Into<String>) -> Self {
        Self {
            vpa: VpaClient::new(dispatcher, api_key),
        }
    }

    pub fn vpa(&self) -> &VpaClient {
        &self.vpa
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        assert_gateway_error, assert_signed_with, error_envelope, success_envelope,
        MockTransport, TestFixtures,
    };
    use crate::PaytringError;
    use serde_json::json;

    #[tokio::test]
    async fn test_validate_valid_vpa() {
        let mock = MockTransport::new();
        mock.push_json(
            200,
            success_envelope(json!({"valid": true, "name": "Test User"})),
        );
        let client = TestFixtures::client(mock.clone());

        let result = client.upi().vpa().validate("test@upi").await.unwrap();
        assert_eq!(
            result,
            VpaValidation {
                valid: true,
                name: Some("Test User".to_string()),
                message: None,
            }
        );

        let request = mock.last_request().unwrap();
        assert!(request.url.ends_with("/api/v1/upi/validate"));
        assert_eq!(
            request.body.as_ref().unwrap()["vpa"],
            json!("test@upi")
        );
        assert_eq!(
            request.body.as_ref().unwrap()["key"],
            json!(TestFixtures::API_KEY)
        );
        assert_signed_with(&request, TestFixtures::API_SECRET);
    }

    #[tokio::test]
    async fn test_validate_invalid_vpa() {
        let mock = MockTransport::new();
        mock.push_json(200, success_envelope(json!({"valid": false})));
        let client = TestFixtures::client(mock.clone());

        let result = client.upi().vpa().validate("nobody@upi").await.unwrap();
        assert!(!result.valid);
        assert!(result.name.is_none());
    }

    #[tokio::test]
    async fn test_validate_gateway_error() {
        let mock = MockTransport::new();
        mock.push_json(200, error_envelope("VPA service unavailable"));
        let client = TestFixtures::client(mock.clone());

        let result = client.upi().vpa().validate("test@upi").await;
        assert_gateway_error(&result, "unavailable");
    }

    #[tokio::test]
    async fn test_validate_rejects_empty_vpa() {
        let mock = MockTransport::new();
        let client = TestFixtures::client(mock.clone());

        let err = client.upi().vpa().validate("").await.unwrap_err();
        assert!(matches!(err, PaytringError::InvalidData { .. }));
        assert_eq!(mock.request_count(), 0);
    }
}
