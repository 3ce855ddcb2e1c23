//! apiprobe Domain - Core harness types
//!
//! This crate defines the data model of the API test harness: endpoints,
//! responses, expectations, log records and scenario tables.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod expectation;
pub mod json_path;
pub mod record;
pub mod report;
pub mod request;
pub mod response;
pub mod scenario;
pub mod settings;

pub use error::{DomainError, DomainResult};
pub use expectation::{
    BodyPredicate, Expectation, ExpectationError, UnexpectedStatusPolicy, Verdict,
};
pub use record::{LogLevel, LogRecord, Outcome};
pub use report::{LatencyStats, LoadReport, ScenarioReport, SuiteReport};
pub use request::{Endpoint, HttpMethod, Payload, QueryParam, QueryParams};
pub use response::{Response, StatusCode};
pub use scenario::{Scenario, ScenarioSuite};
pub use settings::{DEFAULT_BASE_URL, LoadSettings, Settings};
