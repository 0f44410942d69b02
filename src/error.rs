//! Error types for the lotocheck shell
//!
//! The core never fails; these cover configuration coming from the
//! environment and files.

use thiserror::Error;

use lotocheck_agentic::ParseBackendError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key}='{value}' is not valid: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{key}={value} exceeds the limit of {limit}")]
    OutOfRange {
        key: &'static str,
        value: usize,
        limit: usize,
    },

    #[error(transparent)]
    Backend(#[from] ParseBackendError),
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
