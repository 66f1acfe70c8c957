//! Core domain errors.

use thiserror::Error;

/// Core domain errors for AITI Chat.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Chain length outside the accepted range.
    #[error("Invalid chain length {0}: must be between 1 and 10")]
    InvalidChainLength(u8),

    /// Model tag not recognised.
    #[error("Unknown model: {0}")]
    UnknownModel(String),
}
