//! Error type definitions for the live commentary engine
//!
//! This module defines the error types used throughout the crate. Fetch-cycle
//! errors are deliberately separate from application errors: the former are
//! always absorbed into the skip path, the latter are returned to callers.

use std::time::Duration;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors of a single commentary fetch cycle
///
/// Every variant maps onto a skipped result; see
/// [`NormalizedResult::from_failure`](crate::models::NormalizedResult::from_failure).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommentaryError {
    /// The request could not be sent or the response could not be read
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Non-2xx status or otherwise unusable response
    #[error("HTTP {status}: {message}")]
    Protocol { status: u16, message: String },

    /// The backend did not answer within the configured request timeout
    #[error("request timed out after {}", humantime::format_duration(*.after))]
    Timeout { after: Duration },

    /// The response body could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl CommentaryError {
    /// Create a transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Short machine-readable category, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            CommentaryError::Transport { .. } => "transport",
            CommentaryError::Protocol { .. } => "protocol",
            CommentaryError::Timeout { .. } => "timeout",
            CommentaryError::Decode { .. } => "decode",
        }
    }
}

impl From<reqwest::Error> for CommentaryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CommentaryError::transport(format!("request timed out: {err}"))
        } else if err.is_decode() || err.is_body() {
            CommentaryError::Decode {
                message: err.to_string(),
            }
        } else {
            CommentaryError::transport(err.to_string())
        }
    }
}
