//! NGAP Error Types

use ogs_per::PerError;
use thiserror::Error;

/// Errors that can occur while building NGAP messages
#[derive(Error, Debug)]
pub enum NgapError {
    /// PER encoding error
    #[error("PER codec error: {0}")]
    Per(#[from] PerError),

    /// Malformed gNB configuration document
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid IE value
    #[error("Invalid IE value for {ie_name}: {reason}")]
    InvalidIeValue {
        ie_name: &'static str,
        reason: String,
    },
}

pub type NgapResult<T> = Result<T, NgapError>;
