//! Inbound webhook verification.
//!
//! The gateway signs callback bodies with the same canonical hash used for
//! requests and sends the digest in the `x-paytring-signature` header.
//!
//! # Example
//!
//! ```rust,ignore
//! use paytring::webhook::WebhookVerifier;
//!
//! let verifier = WebhookVerifier::new(std::env::var("PAYTRING_API_SECRET")?);
//!
//! // In your webhook handler:
//! if !verifier.verify_request(&headers, &body)? {
//!     return Err(StatusCode::BAD_REQUEST);
//! }
//! ```

use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiSecret;
use crate::hash::{verify_hash, Payload};
use crate::{PaytringError, Result};

/// Header carrying the callback signature.
pub const SIGNATURE_HEADER: &str = "x-paytring-signature";

/// Read the signature header, if present and valid UTF-8.
pub fn signature_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
}

/// Verifies webhook callbacks against the API secret.
#[derive(Clone, Debug)]
pub struct WebhookVerifier {
    secret: ApiSecret,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<ApiSecret>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify an already-parsed payload.
    pub fn verify_payload(&self, payload: &Payload, signature: &str) -> bool {
        let valid = verify_hash(payload, self.secret.expose_secret(), signature);
        if !valid {
            #[cfg(feature = "tracing")]
            tracing::warn!(fields = payload.len(), "webhook signature mismatch");
        }
        valid
    }

    /// Verify a raw JSON body.
    ///
    /// Errors only when the body is not a JSON object; a wrong signature is
    /// `Ok(false)`.
    pub fn verify(&self, body: &[u8], signature: &str) -> Result<bool> {
        let payload = parse_body(body)?;
        Ok(self.verify_payload(&payload, signature))
    }

    /// Verify a raw body using the signature header. A missing header is
    /// `Ok(false)`.
    pub fn verify_request(&self, headers: &HeaderMap, body: &[u8]) -> Result<bool> {
        match signature_from_headers(headers) {
            Some(signature) => self.verify(body, signature),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!("webhook without {} header", SIGNATURE_HEADER);
                Ok(false)
            }
        }
    }

    /// Verify, then deserialize the body into `T`.
    ///
    /// A bad or missing signature is [`PaytringError::InvalidSignature`].
    pub fn parse<T: DeserializeOwned>(&self, headers: &HeaderMap, body: &[u8]) -> Result<T> {
        if !self.verify_request(headers, body)? {
            return Err(PaytringError::InvalidSignature);
        }
        Ok(serde_json::from_slice(body)?)
    }
}

fn parse_body(body: &[u8]) -> Result<Payload> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(PaytringError::invalid_data(
            "webhook body",
            "expected a JSON object",
        )),
    }
}
