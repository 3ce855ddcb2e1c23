//! HTTP Client port

use std::future::Future;
use std::pin::Pin;

use apiprobe_domain::{Endpoint, Response};
use thiserror::Error;

/// Transport-level failures: the request never produced an HTTP response.
///
/// An HTTP error status is *not* a transport error; it arrives as a normal
/// [`Response`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The base URL and path do not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// DNS resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// A connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request did not complete within the timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The body could not be encoded or read.
    #[error("failed to transfer body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Port for dispatching endpoints.
///
/// Implementations perform no validation or retry: whatever status and body
/// the server returns ends up in the [`Response`].
pub trait HttpClient: Send + Sync {
    /// Dispatches the endpoint against the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no HTTP response was received.
    fn execute(
        &self,
        endpoint: &Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + '_>>;

    /// Base URL endpoints are resolved against.
    fn base_url(&self) -> &str;
}
