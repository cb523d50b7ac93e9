//! Error types for the compiler feature
//!
//! Dispatch failures are collapsed into a small fixed set of categories before
//! they reach any caller. The `Display` text of [`ExecutionError`] is the exact
//! message shown to users; transport details are kept out of it and only
//! logged.

use thiserror::Error;

pub const TIMEOUT_MESSAGE: &str = "Code execution timed out (30s limit exceeded)";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please wait before executing again.";
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Compiler service is currently unavailable. Please try again later.";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Code execution failed. Please check your code and try again.";

/// Classified failure of a single dispatch to the execution service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,
    #[error("{}", RATE_LIMITED_MESSAGE)]
    RateLimited,
    #[error("{}", SERVICE_UNAVAILABLE_MESSAGE)]
    ServiceUnavailable,
    #[error("{0}")]
    ServerReported(String),
    #[error("{}", GENERIC_FAILURE_MESSAGE)]
    UnknownFailure { detail: String },
}

impl ExecutionError {
    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::UnknownFailure {
            detail: detail.into(),
        }
    }

    /// Short machine-friendly name of the category
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutionError::Timeout => "timeout",
            ExecutionError::RateLimited => "rate_limited",
            ExecutionError::ServiceUnavailable => "service_unavailable",
            ExecutionError::ServerReported(_) => "server_reported",
            ExecutionError::UnknownFailure { .. } => "unknown",
        }
    }

    /// User-facing message for this failure
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[derive(Error, Debug, Clone)]
pub enum ArenaError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Parsing error: {0}")]
    ParsingError(String),
    #[error("HTTP request failed: {0}")]
    HttpError(String),
    #[error("Compiler API error: {0}")]
    ApiError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<std::io::Error> for ArenaError {
    fn from(err: std::io::Error) -> Self {
        ArenaError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ArenaError {
    fn from(err: serde_yaml::Error) -> Self {
        ArenaError::ParsingError(err.to_string())
    }
}

impl From<serde_json::Error> for ArenaError {
    fn from(err: serde_json::Error) -> Self {
        ArenaError::ParsingError(err.to_string())
    }
}
