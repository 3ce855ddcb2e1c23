//! apiprobe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings and suite loading.

pub mod adapters;
pub mod logging;
pub mod serialization;
pub mod settings;

pub use adapters::{ReqwestHttpClient, SystemClock, USER_AGENT};
pub use logging::{FileLogSink, MemoryLogSink, RECORD_TARGET, SinkRegistry, format_line};
pub use serialization::{
    SerializationError, SuiteFormat, from_json, load_suite, parse_suite, to_json_stable,
    write_report,
};
pub use settings::{ConfigLoadError, SettingsLoader, SettingsOverrides, load_settings};
