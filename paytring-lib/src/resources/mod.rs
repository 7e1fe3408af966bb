//! Endpoint-specific clients.
//!
//! Each client only shapes a payload (adding the API key where the gateway
//! expects it) and hands it to the [`Dispatcher`](crate::Dispatcher).

mod order;
mod upi;

pub use order::{OrderClient, OrderRequest, OrderResponse};
pub use upi::{UpiClient, VpaClient, VpaValidation};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::hash::Payload;
use crate::{PaytringError, Result};

/// Field carrying the API key in signed bodies.
pub(crate) const KEY_FIELD: &str = "key";

pub(crate) fn with_key(mut payload: Payload, api_key: &str) -> Payload {
    payload.insert(KEY_FIELD.to_string(), Value::String(api_key.to_string()));
    payload
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PaytringError::invalid_data(field, "cannot be empty"));
    }
    Ok(())
}

/// Path segment for a caller-supplied identifier.
pub(crate) fn path_segment(field: &str, value: &str) -> Result<String> {
    require_non_empty(field, value)?;
    Ok(urlencoding::encode(value.trim()).into_owned())
}

/// Accepts `"123"` or `123`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Accepts `1000`, `"1000"` or null.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid amount {:?}", s))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected amount, got {}",
            other
        ))),
    }
}
