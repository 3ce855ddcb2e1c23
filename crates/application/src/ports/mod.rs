//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness core and the outside
//! world. Each port is a trait implemented by adapters in the infrastructure
//! layer.

mod clock;
mod http_client;
mod log_sink;

pub use clock::Clock;
pub use http_client::{HttpClient, TransportError};
pub use log_sink::{LogSink, SinkError};
