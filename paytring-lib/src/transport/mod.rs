//! HTTP transport seam.
//!
//! The dispatcher never talks to an HTTP library directly; it hands a fully
//! built [`HttpRequest`] to an injected [`HttpTransport`]. The default
//! implementation is [`ReqwestTransport`] (feature `http-client`). Tests and
//! alternative runtimes provide their own.

#[cfg(feature = "http-client")]
mod http_client;
mod traits;

#[cfg(feature = "http-client")]
pub use http_client::ReqwestTransport;
pub use traits::{HttpRequest, HttpResponse, HttpTransport};
