//! HTTP Response domain types

mod model;

pub use model::{Response, StatusCode};
