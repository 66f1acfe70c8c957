//! Session errors.

use aiti_core::{ConversationId, CoreError};
use thiserror::Error;

/// Errors returned by session operations.
///
/// None of these leave the session in a partially updated state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Operation referenced a conversation that does not exist.
    #[error("Unknown conversation: {0}")]
    UnknownConversation(ConversationId),

    /// Clipboard could not be written.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Invalid configuration value.
    #[error(transparent)]
    Core(#[from] CoreError),
}
