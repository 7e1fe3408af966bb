//! Test fixtures and envelope builders.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::{ClientConfig, Credentials};
use crate::resources::OrderRequest;
use crate::transport::HttpTransport;
use crate::Paytring;

/// Collection of commonly used test fixtures.
pub struct TestFixtures;

impl TestFixtures {
    pub const API_KEY: &'static str = "test_api_key";
    pub const API_SECRET: &'static str = "test_api_secret";
    pub const BASE_URL: &'static str = "https://gateway.test";

    pub fn credentials() -> Credentials {
        Credentials::new(Self::API_KEY, Self::API_SECRET)
    }

    /// Client wired to `transport` with the fixture credentials.
    ///
    /// # Panics
    /// Panics if the fixture configuration is rejected.
    pub fn client(transport: Arc<dyn HttpTransport>) -> Paytring {
        Self::client_with_config(ClientConfig::new(Self::BASE_URL), transport)
    }

    pub fn client_with_config(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Paytring {
        Paytring::with_transport(Self::credentials(), config, transport)
            .expect("fixture client configuration is valid")
    }
}

/// `{"status": true, "data": data}`
pub fn success_envelope(data: Value) -> Value {
    json!({ "status": true, "data": data })
}

/// `{"status": false, "error": {"message": message}}`
pub fn error_envelope(message: &str) -> Value {
    json!({ "status": false, "error": { "message": message } })
}

/// A valid order for ₹10.00.
pub fn sample_order() -> OrderRequest {
    OrderRequest::new(
        "John Doe",
        "john.doe@example.com",
        9876543210,
        1000,
        "receipt_001",
        "https://merchant.example.com/payment/callback",
    )
}
