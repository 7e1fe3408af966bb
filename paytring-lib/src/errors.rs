//! Error types for Paytring operations.
//!
//! Failures fall into three families that mirror where the request broke:
//!
//! - **Transport**: the request never got a response (connection refused,
//!   DNS, TLS, timeout).
//! - **Protocol**: a response arrived but it is not something the gateway
//!   contract allows (non-2xx status, non-JSON body, missing envelope).
//! - **Gateway**: the gateway answered with `status: false`. The gateway's
//!   message is carried verbatim.
//!
//! None of these are retried by the library.

use std::fmt;

use crate::config::ConfigError;

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PaytringErrorCode {
    /// Transport/network layer error
    Transport = 2000,
    /// Connection failed
    ConnectionFailed = 2001,
    /// Connection timeout
    ConnectionTimeout = 2002,
    /// Unexpected HTTP status or malformed response
    Protocol = 2100,
    /// Invalid credentials
    InvalidCredentials = 3002,
    /// Webhook signature did not match
    InvalidSignature = 3003,
    /// Invalid request/data
    InvalidData = 5000,
    /// Serialization error
    Serialization = 5002,
    /// Invalid client configuration
    InvalidConfig = 5003,
    /// Request rejected by the gateway
    Gateway = 6000,
}

/// Comprehensive error type for Paytring operations.
#[derive(Debug)]
pub enum PaytringError {
    /// Transport/network layer error.
    Transport(String),

    /// Connection failed.
    ConnectionFailed {
        /// Target URL
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// Connection timeout.
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Non-2xx response or a body that does not follow the envelope contract.
    Protocol {
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// What was wrong with the response
        message: String,
    },

    /// The gateway answered with `status: false`.
    ///
    /// The message is the gateway's `error.message`, unmodified.
    Gateway(String),

    /// API key or secret rejected before any request was made.
    InvalidCredentials(String),

    /// Webhook signature did not match the payload.
    InvalidSignature,

    /// Invalid data provided.
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// Client configuration is unusable.
    InvalidConfig(String),
}

impl PaytringError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> PaytringErrorCode {
        match self {
            Self::Transport(_) => PaytringErrorCode::Transport,
            Self::ConnectionFailed { .. } => PaytringErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => PaytringErrorCode::ConnectionTimeout,
            Self::Protocol { .. } => PaytringErrorCode::Protocol,
            Self::Gateway(_) => PaytringErrorCode::Gateway,
            Self::InvalidCredentials(_) => PaytringErrorCode::InvalidCredentials,
            Self::InvalidSignature => PaytringErrorCode::InvalidSignature,
            Self::InvalidData { .. } => PaytringErrorCode::InvalidData,
            Self::Serialization(_) => PaytringErrorCode::Serialization,
            Self::InvalidConfig(_) => PaytringErrorCode::InvalidConfig,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// True for failures where no response was received.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConnectionFailed { .. } | Self::ConnectionTimeout { .. }
        )
    }

    /// True when a response arrived but broke the wire contract.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }

    /// The gateway's rejection message, if this is a gateway error.
    pub fn gateway_message(&self) -> Option<&str> {
        match self {
            Self::Gateway(msg) => Some(msg),
            _ => None,
        }
    }

    /// Returns true if retrying the same call could succeed.
    ///
    /// Callers that retry order creation may create duplicate orders: the
    /// gateway has no idempotency key.
    pub fn is_retryable(&self) -> bool {
        self.is_transport()
    }

    /// Create a protocol error.
    pub fn protocol(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Protocol {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PaytringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::ConnectionFailed { target, reason } => {
                write!(f, "connection to {} failed: {}", target, reason)
            }
            Self::ConnectionTimeout {
                operation,
                timeout_ms,
            } => {
                write!(f, "{} timed out after {}ms", operation, timeout_ms)
            }
            Self::Protocol { status, message } => match status {
                Some(code) => write!(f, "protocol error (HTTP {}): {}", code, message),
                None => write!(f, "protocol error: {}", message),
            },
            Self::Gateway(msg) => write!(f, "{}", msg),
            Self::InvalidCredentials(msg) => write!(f, "invalid credentials: {}", msg),
            Self::InvalidSignature => write!(f, "signature does not match payload"),
            Self::InvalidData { field, reason } => {
                write!(f, "invalid {}: {}", field, reason)
            }
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for PaytringError {}

impl From<serde_json::Error> for PaytringError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ConfigError> for PaytringError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
