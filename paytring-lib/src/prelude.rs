//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use paytring::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Client: `Paytring`, `ClientConfig`, `Credentials`
//! - Error types: `PaytringError`, `PaytringErrorCode`, `Result`
//! - Hashing: `create_hash`, `verify_hash`, `Payload`, `WebhookVerifier`
//! - Resource types: `OrderRequest`, `OrderResponse`, `VpaValidation`
//! - Transport trait: `HttpTransport`

// Client
pub use crate::config::{ClientConfig, Credentials, Environment};
pub use crate::Paytring;

// Error handling
pub use crate::errors::{PaytringError, PaytringErrorCode};
pub use crate::Result;

// Hashing
pub use crate::hash::{create_hash, verify_hash, Payload};
pub use crate::webhook::{WebhookVerifier, SIGNATURE_HEADER};

// Resources
pub use crate::resources::{OrderRequest, OrderResponse, VpaValidation};

// Transport
pub use crate::transport::HttpTransport;
#[cfg(feature = "http-client")]
pub use crate::transport::ReqwestTransport;
