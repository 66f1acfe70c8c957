//! Messages between the UI thread and the session backend.

use aiti_core::{ConversationId, ModelTag};
use aiti_session::Notice;

/// Events sent from the backend to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    /// Transient notification to show in the footer.
    Notice(Notice),
}

/// Commands sent from the UI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Send a user message.
    Send(String),
    /// Start a new chat.
    NewChat,
    /// Make a conversation active.
    Select(ConversationId),
    /// Delete a conversation.
    Delete(ConversationId),
    /// Delete every conversation.
    ClearAll,
    /// Copy a conversation to the clipboard.
    Share(ConversationId),
    /// Switch persona.
    SetModel(ModelTag),
    /// Quit the backend.
    Quit,
}
