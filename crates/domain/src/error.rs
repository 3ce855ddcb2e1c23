//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while building harness types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The endpoint definition is inconsistent (empty path, wrong payload for the method).
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The HTTP method is not supported by the harness.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A JSON path expression is malformed.
    #[error("invalid JSON path '{path}': {reason}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A regex pattern in a body predicate does not compile.
    #[error("invalid pattern /{pattern}/: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// A settings value is out of range or malformed.
    #[error("invalid setting `{key}`: {reason}")]
    InvalidSetting {
        /// Settings key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
