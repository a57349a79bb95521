//! Observability subsystem for hobbygraph
//!
//! Logging goes through `tracing`. This module installs the process-wide
//! subscriber: human-readable lines on stderr, filtered by `RUST_LOG` when
//! set and by the configured filter otherwise.
//!
//! Stdout is left to command output.

mod logging;

pub use logging::{build_filter, init_logging};

use std::fmt;

/// Observability error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservabilityErrorCode {
    /// The filter directive could not be parsed
    InvalidFilter,
    /// A global subscriber was already installed
    AlreadyInitialized,
}

impl ObservabilityErrorCode {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservabilityErrorCode::InvalidFilter => "OBSERVABILITY_INVALID_FILTER",
            ObservabilityErrorCode::AlreadyInitialized => "OBSERVABILITY_ALREADY_INITIALIZED",
        }
    }
}

impl fmt::Display for ObservabilityErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observability error
///
/// Never fatal: a process without logging keeps serving.
#[derive(Debug)]
pub struct ObservabilityError {
    code: ObservabilityErrorCode,
    message: String,
}

impl ObservabilityError {
    pub fn invalid_filter(filter: &str, reason: impl fmt::Display) -> Self {
        Self {
            code: ObservabilityErrorCode::InvalidFilter,
            message: format!("Invalid log filter '{}': {}", filter, reason),
        }
    }

    pub fn already_initialized(reason: impl fmt::Display) -> Self {
        Self {
            code: ObservabilityErrorCode::AlreadyInitialized,
            message: reason.to_string(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ObservabilityErrorCode {
        self.code
    }

    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ObservabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ObservabilityError {}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
