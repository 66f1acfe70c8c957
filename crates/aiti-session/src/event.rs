//! Events published by the session for the rendering layer.

use aiti_core::{ConversationId, Message, MessageId, ModelTag};

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient, user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// State changes, in the order they were applied.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A message was appended to a conversation.
    MessageAppended {
        conversation_id: ConversationId,
        message: Message,
    },
    /// A streaming message has new content (a longer prefix of its reply).
    MessageUpdated {
        conversation_id: ConversationId,
        message_id: MessageId,
        content: String,
    },
    /// A message stopped streaming; `content` is its final text.
    MessageFinalized {
        conversation_id: ConversationId,
        message_id: MessageId,
        content: String,
    },
    /// A generation started or ended.
    LoadingChanged(bool),
    /// The active conversation changed.
    ActiveConversationChanged(Option<ConversationId>),
    /// Conversations were created or removed.
    HistoryChanged,
    /// The selected persona changed.
    ModelChanged(ModelTag),
    /// Transient notification.
    Notice(Notice),
}
