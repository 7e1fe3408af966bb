//! Test assertions and verification helpers.

use serde_json::Value;

use crate::hash::{verify_hash, HASH_FIELD};
use crate::transport::HttpRequest;
use crate::{PaytringError, Result};

/// Assert that a call was rejected by the gateway with a message containing
/// `expected`.
///
/// # Panics
/// Panics on success or on any non-gateway error.
pub fn assert_gateway_error<T: std::fmt::Debug>(result: &Result<T>, expected: &str) {
    match result {
        Err(PaytringError::Gateway(message)) => assert!(
            message.contains(expected),
            "gateway message {:?} does not contain {:?}",
            message,
            expected
        ),
        Err(other) => panic!("expected gateway error, got {:?}", other),
        Ok(value) => panic!("expected gateway error, got Ok({:?})", value),
    }
}

/// Assert that `request` carries a JSON body whose `hash` matches the rest of
/// the body under `secret`.
///
/// # Panics
/// Panics if the body is missing, unsigned, or signed with another secret.
pub fn assert_signed_with(request: &HttpRequest, secret: &str) {
    let mut body = match &request.body {
        Some(Value::Object(map)) => map.clone(),
        other => panic!("expected a JSON object body, got {:?}", other),
    };
    let hash = match body.remove(HASH_FIELD) {
        Some(Value::String(hash)) => hash,
        other => panic!("expected a string hash field, got {:?}", other),
    };
    assert!(
        verify_hash(&body, secret, &hash),
        "request hash does not match body"
    );
}
