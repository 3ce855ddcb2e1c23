//! HTTP Request domain types

mod endpoint;
mod method;
mod query;

pub use endpoint::{Endpoint, Payload};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
