//! Pure derivations over the conversation collection.

use aiti_core::{Conversation, Message, PLACEHOLDER_TITLE};

/// Conversations ordered by most recent activity, newest first.
pub fn sorted_newest_first(conversations: &[Conversation]) -> Vec<Conversation> {
    let mut sorted = conversations.to_vec();
    sorted.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
    sorted
}

/// Title for display, falling back to the placeholder.
pub fn display_title(conversation: &Conversation) -> &str {
    let title = conversation.title.trim();
    if title.is_empty() {
        PLACEHOLDER_TITLE
    } else {
        title
    }
}

/// Speaker label derived from role and persona.
pub fn speaker_label(message: &Message) -> &'static str {
    message.speaker()
}

/// Serialize a conversation as `"<Speaker>: <content>"` blocks separated by blank lines.
pub fn share_text(conversation: &Conversation) -> String {
    conversation
        .messages
        .iter()
        .map(|m| format!("{}: {}", speaker_label(m), m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use aiti_core::ModelTag;
    use chrono::{Duration, Utc};

    use super::*;

    fn conversation_at(title: &str, minutes_ago: i64) -> Conversation {
        let mut conv = Conversation::new();
        conv.title = title.to_string();
        conv.created_at = Utc::now() - Duration::minutes(minutes_ago);
        conv
    }

    #[test]
    fn test_sorted_newest_first() {
        let old = conversation_at("old", 30);
        let mid = conversation_at("mid", 10);
        let mut revived = conversation_at("revived", 60);
        let mut msg = Message::user("again", ModelTag::Aiti);
        msg.created_at = Utc::now() - Duration::minutes(1);
        revived.messages.push(msg);

        let sorted = sorted_newest_first(&[old, mid, revived]);
        let titles: Vec<_> = sorted.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["revived", "mid", "old"]);
    }

    #[test]
    fn test_display_title_fallback() {
        let conv = conversation_at("   ", 0);
        assert_eq!(display_title(&conv), PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_share_text_format() {
        let mut conv = Conversation::new();
        conv.push(Message::user("hello", ModelTag::AitiPro));
        let mut reply = Message::assistant_placeholder(ModelTag::AitiPro);
        reply.content = "Hi!".to_string();
        reply.is_streaming = false;
        conv.push(reply);
        let mut remote = Message::assistant_placeholder(ModelTag::Ollama);
        remote.content = "Hey".to_string();
        conv.push(remote);

        assert_eq!(
            share_text(&conv),
            "You: hello\n\nAITI Coder: Hi!\n\nOllama: Hey"
        );
    }

    #[test]
    fn test_share_text_empty_conversation() {
        assert_eq!(share_text(&Conversation::new()), "");
    }
}
