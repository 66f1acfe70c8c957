//! Conversation type and title derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ConversationId, MessageId};
use crate::message::Message;

/// Title shown for a conversation without a user message.
pub const PLACEHOLDER_TITLE: &str = "New conversation";

/// Maximum characters taken from the first user message for a title.
pub const TITLE_MAX_CHARS: usize = 30;

/// An ordered conversation between the user and one or more personas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    /// Messages in chronological order.
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation with the placeholder title.
    pub fn new() -> Self {
        Self {
            id: ConversationId::generate(),
            title: PLACEHOLDER_TITLE.to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a message, deriving the title from the first user message.
    pub fn push(&mut self, message: Message) {
        if message.is_user() && self.has_placeholder_title() {
            self.title = derive_title(&message.content);
        }
        self.messages.push(message);
    }

    pub fn has_placeholder_title(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn message_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| &m.id == id)
    }

    /// Time of the newest message, or creation time when empty.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.messages
            .last()
            .map(|m| m.created_at)
            .unwrap_or(self.created_at)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a bounded title from message text.
///
/// Uses the first non-empty line, cut to [`TITLE_MAX_CHARS`] characters
/// with `...` appended when cut.
pub fn derive_title(content: &str) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");

    if line.is_empty() {
        return PLACEHOLDER_TITLE.to_string();
    }

    if line.chars().count() <= TITLE_MAX_CHARS {
        return line.to_string();
    }

    let mut title: String = line.chars().take(TITLE_MAX_CHARS).collect();
    title.truncate(title.trim_end().len());
    title.push_str("...");
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelTag;

    #[test]
    fn test_title_from_first_user_message() {
        let mut conv = Conversation::new();
        assert!(conv.has_placeholder_title());

        conv.push(Message::user("  What is Rust?\nmore text", ModelTag::Aiti));
        assert_eq!(conv.title, "What is Rust?");

        // Later user messages do not rename the conversation
        conv.push(Message::user("Another question", ModelTag::Aiti));
        assert_eq!(conv.title, "What is Rust?");
    }

    #[test]
    fn test_title_is_bounded() {
        let title = derive_title("abcdefghij abcdefghij abcdefghij abcdefghij");
        assert_eq!(title, "abcdefghij abcdefghij abcdefgh...");
        assert!(title.chars().count() <= TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_title_handles_multibyte() {
        let title = derive_title(&"é".repeat(40));
        assert_eq!(title, format!("{}...", "é".repeat(TITLE_MAX_CHARS)));
    }

    #[test]
    fn test_assistant_message_keeps_placeholder() {
        let mut conv = Conversation::new();
        conv.push(Message::assistant_placeholder(ModelTag::Aiti));
        assert_eq!(conv.title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_last_activity_falls_back_to_created_at() {
        let conv = Conversation::new();
        assert_eq!(conv.last_activity(), conv.created_at);
    }
}
