//! Test utilities for Paytring.
//!
//! - [`MockTransport`]: an [`HttpTransport`](crate::transport::HttpTransport)
//!   that replays queued responses and records every request
//! - Envelope and order fixtures
//! - Assertions for signed requests and gateway errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use paytring::test_utils::{success_envelope, MockTransport, TestFixtures};
//!
//! let mock = MockTransport::new();
//! mock.push_json(200, success_envelope(json!({"valid": true, "name": "Test User"})));
//!
//! let client = TestFixtures::client(mock.clone());
//! let result = client.upi().vpa().validate("test@upi").await?;
//! assert!(result.valid);
//! ```

mod assertions;
mod fixtures;
mod mock_transport;

pub use assertions::{assert_gateway_error, assert_signed_with};
pub use fixtures::{error_envelope, sample_order, success_envelope, TestFixtures};
pub use mock_transport::MockTransport;
