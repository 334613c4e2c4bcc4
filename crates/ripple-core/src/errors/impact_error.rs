//! The core error taxonomy.
//!
//! The core recovers nothing locally; there is no retry and no fallback
//! data source. Errors carry enough context for the HTTP boundary to map
//! them. Partial results (null latencies, incomplete paths) are
//! first-class payload values, never errors. Messages are credential-free.

use super::error_code::{self, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ImpactError {
    #[error("invalid request: {message}")]
    Validation { message: String },

    #[error("service not found: {service}")]
    ServiceNotFound { service: String },

    #[error("upstream graph data is stale{}", stale_suffix(.last_updated_seconds_ago))]
    StaleData { last_updated_seconds_ago: Option<u64> },

    #[error("upstream graph source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("{operation} timed out after {elapsed_ms} ms")]
    SourceTimeout { operation: String, elapsed_ms: u64 },

    #[error("upstream graph source error: {message}")]
    Upstream { message: String },

    #[error("invalid upstream payload: {message}")]
    Protocol { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ImpactError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl ErrorCode for ImpactError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => error_code::VALIDATION_ERROR,
            Self::ServiceNotFound { .. } => error_code::SERVICE_NOT_FOUND,
            Self::StaleData { .. } => error_code::STALE_DATA,
            Self::SourceUnavailable { .. } => error_code::SOURCE_UNAVAILABLE,
            Self::SourceTimeout { .. } => error_code::SOURCE_TIMEOUT,
            Self::Upstream { .. } => error_code::UPSTREAM_ERROR,
            Self::Protocol { .. } => error_code::UPSTREAM_PROTOCOL,
            Self::Internal { .. } => error_code::INTERNAL_ERROR,
        }
    }
}

fn stale_suffix(age: &Option<u64>) -> String {
    match age {
        Some(seconds) => format!(" (last updated {seconds}s ago)"),
        None => String::new(),
    }
}
