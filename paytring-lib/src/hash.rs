//! Canonical payload hashing.
//!
//! Every signed request and every webhook callback carries a SHA-512 digest
//! computed over the payload's *values*, ordered by their sorted keys:
//!
//! ```text
//! payload  = { "b": "value2", "a": "value1" }
//! keys     = [ "a", "b" ]                        (byte order)
//! string   = "value1|value2" + "|" + secret
//! digest   = hex(sha512(string))                 (128 lowercase hex chars)
//! ```
//!
//! Only top-level keys participate. Values are stringified the way the
//! gateway stringifies them (see [`canonical_value`]), so the digest matches
//! byte for byte what the gateway computes on its side.
//!
//! An empty payload hashes `"|" + secret`.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::{PaytringError, Result};

/// Flat key/value payload subject to hashing.
pub type Payload = Map<String, Value>;

/// Separator between canonical values and before the secret.
pub const SEPARATOR: &str = "|";

/// Body field the request hash is attached under.
pub const HASH_FIELD: &str = "hash";

/// Length of a hex-encoded SHA-512 digest.
pub const DIGEST_HEX_LEN: usize = 128;

/// Build the string that gets hashed.
///
/// The result embeds the secret; treat it as sensitive.
pub fn canonical_string(payload: &Payload, secret: &str) -> String {
    let mut keys: Vec<&String> = payload.keys().collect();
    keys.sort_unstable();

    let values: Vec<String> = keys
        .into_iter()
        .map(|key| canonical_value(&payload[key.as_str()]))
        .collect();

    let mut canonical = values.join(SEPARATOR);
    canonical.push_str(SEPARATOR);
    canonical.push_str(secret);
    canonical
}

/// String form of a single payload value.
///
/// | value | form |
/// |---|---|
/// | string | as is |
/// | integer | decimal |
/// | float | shortest round-trip digits, positional for magnitudes in `[1e-6, 1e21)` (`1000.0` → `1000`), exponent form otherwise (`1e-7`, `1.5e+300`) |
/// | bool | `true` / `false` |
/// | null | empty |
/// | array | elements, comma-joined |
/// | object | `[object Object]` |
pub fn canonical_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => canonical_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(canonical_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) => script_number(f),
        None => n.to_string(),
    }
}

/// ECMAScript `Number::toString` for a finite float.
fn script_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip digits as `d.ddde<exp>`.
    let scientific = format!("{:e}", f.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return f.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return f.to_string();
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            format!("{}e{}{}", head, sign, exponent.abs())
        } else {
            format!("{}.{}e{}{}", head, tail, sign, exponent.abs())
        }
    };

    if f.is_sign_negative() {
        format!("-{}", body)
    } else {
        body
    }
}

/// Digest of `payload` under `secret`, as lowercase hex.
pub fn create_hash(payload: &Payload, secret: &str) -> String {
    let canonical = Zeroizing::new(canonical_string(payload, secret));
    hex::encode(Sha512::digest(canonical.as_bytes()))
}

/// Digest of any value that serializes to a JSON object.
pub fn hash_payload<T: Serialize + ?Sized>(value: &T, secret: &str) -> Result<String> {
    let payload = to_payload(value)?;
    Ok(create_hash(&payload, secret))
}

/// Serialize a value into a flat [`Payload`].
pub fn to_payload<T: Serialize + ?Sized>(value: &T) -> Result<Payload> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(PaytringError::invalid_data(
            "payload",
            format!("expected a JSON object, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Recompute the digest and compare it with `candidate`.
///
/// Returns `false` for any mismatch, including empty or malformed
/// candidates. The comparison is exact (no case folding) and constant-time
/// once lengths agree.
pub fn verify_hash(payload: &Payload, secret: &str, candidate: &str) -> bool {
    let expected = create_hash(payload, secret);
    digests_match(&expected, candidate)
}

pub(crate) fn digests_match(expected: &str, candidate: &str) -> bool {
    let (expected, candidate) = (expected.as_bytes(), candidate.as_bytes());
    expected.len() == candidate.len() && bool::from(expected.ct_eq(candidate))
}

/// Hash helpers exposed on the client as `paytring.hash()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashVerifier;

impl HashVerifier {
    pub fn new() -> Self {
        Self
    }

    /// See [`verify_hash`].
    pub fn verify(&self, payload: &Payload, secret: &str, candidate: &str) -> bool {
        verify_hash(payload, secret, candidate)
    }

    /// See [`create_hash`].
    pub fn create(&self, payload: &Payload, secret: &str) -> String {
        create_hash(payload, secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    const ORDER_DIGEST: &str = "adabdbc459d44006f8eb390c6195567b6677ae02b0e7d65dc7e8eb50d4aecd3bd0712dd45be120a378b00f94946133f7fb2d022465dab7a4edf0d88b8ad1f077";

    #[test]
    fn test_known_digest() {
        let data = payload(json!({
            "order_id": "test_order_123",
            "status": "success",
            "amount": 1000
        }));
        assert_eq!(
            canonical_string(&data, "test_secret"),
            "1000|test_order_123|success|test_secret"
        );
        let first = create_hash(&data, "test_secret");
        let second = create_hash(&data, "test_secret");
        assert_eq!(first, ORDER_DIGEST);
        assert_eq!(first, second);
        assert_eq!(first.len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let mut forward = Payload::new();
        forward.insert("a".into(), json!("value1"));
        forward.insert("b".into(), json!("value2"));
        let mut reverse = Payload::new();
        reverse.insert("b".into(), json!("value2"));
        reverse.insert("a".into(), json!("value1"));

        assert_eq!(create_hash(&forward, "secret"), create_hash(&reverse, "secret"));
        assert_eq!(
            create_hash(&forward, "secret"),
            "82880105d937e2a3e89b5505bc075aa5469c7086914df1ee8cea76a28bbb410f8a3c99ffb9547e8b12f7d328a088d1660ea498b029074e91611928f79819604c"
        );
    }

    #[test]
    fn test_empty_payload() {
        let empty = Payload::new();
        assert_eq!(canonical_string(&empty, "secret"), "|secret");
        assert_eq!(
            create_hash(&empty, "secret"),
            "baa074ff29db3faa6588937a27d778a139be913c156bdb5a514284f8517ae047992bec2ab59db35db3266f4391b4be768cdf9abc7175356b1ff91f2a2cf7f1d9"
        );
    }

    #[test]
    fn test_value_change_changes_digest() {
        let a = payload(json!({"key1": "value1", "key2": "value2"}));
        let b = payload(json!({"key1": "value1", "key2": "different_value"}));
        assert_ne!(create_hash(&a, "secret"), create_hash(&b, "secret"));
    }

    #[test]
    fn test_secret_changes_digest() {
        let data = payload(json!({"key1": "value1"}));
        assert_ne!(create_hash(&data, "secret"), create_hash(&data, "secret2"));
    }

    #[test]
    fn test_keys_sort_bytewise() {
        let data = payload(json!({"b": "2", "B": "1", "a": "3", "_": "0"}));
        assert_eq!(canonical_string(&data, "s"), "1|0|3|2|s");
    }

    #[test]
    fn test_value_coercion() {
        assert_eq!(canonical_value(&json!("text")), "text");
        assert_eq!(canonical_value(&json!(9876543210u64)), "9876543210");
        assert_eq!(canonical_value(&json!(-42)), "-42");
        assert_eq!(canonical_value(&json!(1000.0)), "1000");
        assert_eq!(canonical_value(&json!(10.5)), "10.5");
        assert_eq!(canonical_value(&json!(-0.0)), "0");
        assert_eq!(canonical_value(&json!(0.1)), "0.1");
        assert_eq!(canonical_value(&json!(-12.25)), "-12.25");
        assert_eq!(canonical_value(&json!(0.000001)), "0.000001");
        assert_eq!(canonical_value(&json!(1e-7)), "1e-7");
        assert_eq!(canonical_value(&json!(-2.5e-8)), "-2.5e-8");
        assert_eq!(canonical_value(&json!(1e20)), "100000000000000000000");
        assert_eq!(canonical_value(&json!(1.2345678901234568e20)), "123456789012345680000");
        assert_eq!(canonical_value(&json!(1e21)), "1e+21");
        assert_eq!(canonical_value(&json!(1.5e300)), "1.5e+300");
        assert_eq!(canonical_value(&json!(true)), "true");
        assert_eq!(canonical_value(&json!(false)), "false");
        assert_eq!(canonical_value(&Value::Null), "");
        assert_eq!(canonical_value(&json!([1, "two", null, [3, 4]])), "1,two,,3,4");
        assert_eq!(canonical_value(&json!({"nested": 1})), "[object Object]");
    }

    #[test]
    fn test_verify_roundtrip() {
        let data = payload(json!({"order_id": "test_order_123", "status": "success", "amount": 1000}));
        let digest = create_hash(&data, "test_secret");
        assert!(verify_hash(&data, "test_secret", &digest));
        assert!(HashVerifier::new().verify(&data, "test_secret", &digest));
    }

    #[test]
    fn test_verify_rejects_bad_candidates() {
        let data = payload(json!({"order_id": "test_order_123", "status": "success", "amount": 1000}));
        assert!(!verify_hash(&data, "test_secret", "invalid_hash_value"));
        assert!(!verify_hash(&data, "test_secret", ""));
        assert!(!verify_hash(&data, "test_secret", &ORDER_DIGEST.to_uppercase()));
        assert!(!verify_hash(&data, "test_secret", &ORDER_DIGEST[..127]));
        assert!(!verify_hash(&data, "wrong_secret", ORDER_DIGEST));
        assert!(!verify_hash(&data, "test_secret", &format!("{} ", ORDER_DIGEST)));
    }

    #[derive(Serialize)]
    struct Callback<'a> {
        order_id: &'a str,
        status: &'a str,
        amount: u64,
    }

    #[test]
    fn test_hash_payload_from_struct() {
        let callback = Callback {
            order_id: "test_order_123",
            status: "success",
            amount: 1000,
        };
        assert_eq!(hash_payload(&callback, "test_secret").unwrap(), ORDER_DIGEST);
    }

    #[test]
    fn test_hash_payload_rejects_non_objects() {
        let err = hash_payload(&vec![1, 2, 3], "secret").unwrap_err();
        assert!(matches!(err, PaytringError::InvalidData { .. }));
        assert!(err.to_string().contains("an array"));
    }
}
