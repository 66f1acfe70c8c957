//! Chat message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::MessageId;
use crate::model::ModelTag;

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message (prompt).
    User,
    /// Assistant message (response).
    Assistant,
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message id.
    pub id: MessageId,
    /// Message body. Grows while streaming, fixed afterwards.
    pub content: String,
    /// Role of this message.
    pub role: Role,
    /// Persona active when the message was created.
    pub model: ModelTag,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// True while an assistant message is still receiving text.
    #[serde(default)]
    pub is_streaming: bool,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>, model: ModelTag) -> Self {
        Self {
            id: MessageId::generate(),
            content: content.into(),
            role: Role::User,
            model,
            created_at: Utc::now(),
            is_streaming: false,
        }
    }

    /// Create an empty assistant message that is about to stream.
    pub fn assistant_placeholder(model: ModelTag) -> Self {
        Self {
            id: MessageId::generate(),
            content: String::new(),
            role: Role::Assistant,
            model,
            created_at: Utc::now(),
            is_streaming: true,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Speaker label: "You" for the user, the persona name otherwise.
    pub fn speaker(&self) -> &'static str {
        match self.role {
            Role::User => "You",
            Role::Assistant => self.model.display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_never_streams() {
        let msg = Message::user("hi", ModelTag::Aiti);
        assert!(!msg.is_streaming);
        assert_eq!(msg.speaker(), "You");
    }

    #[test]
    fn test_placeholder_streams_empty() {
        let msg = Message::assistant_placeholder(ModelTag::AitiPro);
        assert!(msg.is_streaming);
        assert!(msg.content.is_empty());
        assert_eq!(msg.speaker(), "AITI Coder");
    }
}
