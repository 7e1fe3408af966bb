//! Paytring payment gateway client.
//!
//! Every request to the gateway is signed with a canonical SHA-512 hash of
//! its body (see [`hash`]); the same scheme authenticates inbound webhook
//! callbacks (see [`webhook`]). Everything else is a thin layer of typed
//! calls over the gateway's JSON API.
//!
//! # Features
//!
//! - **Orders**: create an order and get a payment URL, fetch order status
//! - **UPI**: validate a Virtual Payment Address and resolve its holder name
//! - **Hashing**: create and verify canonical payload hashes
//! - **Transport Abstraction**: the HTTP client is injected and replaceable
//!
//! # Example
//!
//! ```rust,ignore
//! use paytring::{OrderRequest, Paytring};
//!
//! let paytring = Paytring::new("test_your_api_key", "your_api_secret")?;
//!
//! let order = OrderRequest::new(
//!     "John Doe",
//!     "john.doe@example.com",
//!     9876543210,
//!     1000, // ₹10.00 in paise
//!     "receipt_001",
//!     "https://your-website.com/payment/callback",
//! );
//! let created = paytring.order().create(&order).await?;
//! println!("pay at {:?}", created.payment_url);
//!
//! let vpa = paytring.upi().vpa().validate("test@paytm").await?;
//! println!("valid: {}", vpa.valid);
//! ```

use std::sync::Arc;

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod hash;
pub mod prelude;
pub mod resources;
pub mod transport;
pub mod webhook;

/// Test utilities: mock transport, fixtures, assertions.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ApiSecret, ClientConfig, ConfigError, Credentials, Environment};
pub use dispatcher::Dispatcher;
pub use errors::{PaytringError, PaytringErrorCode};
pub use hash::{create_hash, verify_hash, HashVerifier, Payload};
pub use resources::{
    OrderClient, OrderRequest, OrderResponse, UpiClient, VpaClient, VpaValidation,
};
#[cfg(feature = "http-client")]
pub use transport::ReqwestTransport;
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
pub use webhook::{WebhookVerifier, SIGNATURE_HEADER};

/// Common result alias for Paytring operations.
pub type Result<T> = std::result::Result<T, PaytringError>;

/// Gateway client.
///
/// Holds the credentials and the resource clients, all sharing one
/// [`Dispatcher`]. Cheap to share behind an `Arc`; every call is
/// independent of the others.
#[derive(Debug)]
pub struct Paytring {
    credentials: Credentials,
    dispatcher: Arc<Dispatcher>,
    order: OrderClient,
    upi: UpiClient,
    hash: HashVerifier,
}

impl Paytring {
    /// Client for the default gateway endpoint.
    #[cfg(feature = "http-client")]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<ApiSecret>) -> Result<Self> {
        Self::with_config(Credentials::new(api_key, api_secret), ClientConfig::default())
    }

    /// Client with explicit configuration over the reqwest transport.
    #[cfg(feature = "http-client")]
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Self::with_transport(credentials, config, transport)
    }

    /// Client configured entirely from `PAYTRING_*` environment variables.
    #[cfg(feature = "http-client")]
    pub fn from_env() -> Result<Self> {
        Self::with_config(Credentials::from_env()?, ClientConfig::from_env()?)
    }

    /// Client over an injected transport.
    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        if credentials.api_key().trim().is_empty() {
            return Err(PaytringError::InvalidCredentials(
                "API key cannot be empty".to_string(),
            ));
        }
        if credentials.api_secret().is_empty() {
            return Err(PaytringError::InvalidCredentials(
                "API secret cannot be empty".to_string(),
            ));
        }

        let dispatcher = Arc::new(Dispatcher::new(
            config,
            credentials.api_secret().clone(),
            transport,
        )?);
        let order = OrderClient::new(dispatcher.clone(), credentials.api_key());
        let upi = UpiClient::new(dispatcher.clone(), credentials.api_key());

        Ok(Self {
            credentials,
            dispatcher,
            order,
            upi,
            hash: HashVerifier::new(),
        })
    }

    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Test or production, from the key prefix.
    pub fn environment(&self) -> Environment {
        self.credentials.environment()
    }

    pub fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    /// The shared dispatcher, for endpoints without a typed client.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn order(&self) -> &OrderClient {
        &self.order
    }

    pub fn upi(&self) -> &UpiClient {
        &self.upi
    }

    pub fn hash(&self) -> &HashVerifier {
        &self.hash
    }

    /// Webhook verifier bound to this client's secret.
    pub fn webhooks(&self) -> WebhookVerifier {
        WebhookVerifier::new(self.credentials.api_secret().clone())
    }
}
