//! Session state and its synchronous transitions.
//!
//! Every method here completes in one step; the manager calls them under its
//! lock so observers never see a half-applied change.

use std::time::Duration;

use aiti_core::config::validate_chain_length;
use aiti_core::{
    Conversation, ConversationId, CoreError, Message, MessageId, ModelTag, OllamaConfig,
    SessionConfig,
};

use crate::error::SessionError;
use crate::history;

/// A send that has been recorded and is waiting for its reply.
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub conversation_id: ConversationId,
    pub user_message: Message,
    pub assistant_message: Message,
    /// True if the send created a new conversation.
    pub created_conversation: bool,
    pub ollama: OllamaConfig,
    pub reveal_delay: Duration,
}

impl PendingReply {
    pub fn model(&self) -> ModelTag {
        self.assistant_message.model
    }
}

/// Everything a session owns.
///
/// Conversations are stored newest first by creation. The active
/// conversation's message list is the only copy of the current messages.
#[derive(Debug, Clone)]
pub struct SessionState {
    conversations: Vec<Conversation>,
    active_conversation_id: Option<ConversationId>,
    is_loading: bool,
    /// Current settings; the persona and Ollama values are copied into each send.
    config: SessionConfig,
}

/// Immutable copy of the session for rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Conversations ordered by recent activity, newest first.
    pub conversations: Vec<Conversation>,
    pub active_conversation_id: Option<ConversationId>,
    /// Messages of the active conversation.
    pub current_messages: Vec<Message>,
    pub selected_model: ModelTag,
    pub is_loading: bool,
    pub chain_length: u8,
    pub ollama: OllamaConfig,
}

impl SessionState {
    pub fn new(config: SessionConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            conversations: Vec::new(),
            active_conversation_id: None,
            is_loading: false,
            config,
        })
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    fn conversation_mut(&mut self, id: &ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| &c.id == id)
    }

    pub fn active_conversation_id(&self) -> Option<&ConversationId> {
        self.active_conversation_id.as_ref()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_conversation_id
            .as_ref()
            .and_then(|id| self.conversation(id))
    }

    /// Copy of the active conversation's messages; empty when none is active.
    pub fn current_messages(&self) -> Vec<Message> {
        self.active_conversation()
            .map(|c| c.messages.clone())
            .unwrap_or_default()
    }

    pub fn selected_model(&self) -> ModelTag {
        self.config.selected_model
    }

    pub fn set_selected_model(&mut self, model: ModelTag) {
        self.config.selected_model = model;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn chain_length(&self) -> u8 {
        self.config.chain_length
    }

    pub fn set_chain_length(&mut self, length: u8) -> Result<(), CoreError> {
        validate_chain_length(length)?;
        self.config.chain_length = length;
        Ok(())
    }

    pub fn ollama(&self) -> &OllamaConfig {
        &self.config.ollama
    }

    pub fn set_ollama(&mut self, config: OllamaConfig) {
        self.config.ollama = config;
    }

    /// Last `chain_length` finalized messages of the active conversation.
    pub fn context_messages(&self) -> Vec<Message> {
        let Some(conversation) = self.active_conversation() else {
            return Vec::new();
        };
        let finalized: Vec<&Message> = conversation
            .messages
            .iter()
            .filter(|m| !m.is_streaming)
            .collect();
        let skip = finalized.len().saturating_sub(self.config.chain_length as usize);
        finalized.into_iter().skip(skip).cloned().collect()
    }

    /// Record a user message and an empty streaming reply.
    ///
    /// Returns `None` while another generation is in flight.
    pub fn begin_send(&mut self, content: &str) -> Option<PendingReply> {
        if self.is_loading {
            return None;
        }

        let model = self.config.selected_model;
        let user_message = Message::user(content, model);
        let assistant_message = Message::assistant_placeholder(model);

        let active = self
            .active_conversation_id
            .clone()
            .filter(|id| self.conversation(id).is_some());

        let (conversation_id, created_conversation) = match active {
            Some(id) => (id, false),
            None => {
                let conversation = Conversation::new();
                let id = conversation.id.clone();
                self.conversations.insert(0, conversation);
                self.active_conversation_id = Some(id.clone());
                (id, true)
            }
        };

        let conversation = self.conversation_mut(&conversation_id)?;
        conversation.push(user_message.clone());
        conversation.push(assistant_message.clone());
        self.is_loading = true;

        Some(PendingReply {
            conversation_id,
            user_message,
            assistant_message,
            created_conversation,
            ollama: self.config.ollama.clone(),
            reveal_delay: self.config.reveal_delay_for(model),
        })
    }

    /// Returns true if the message still exists.
    pub fn has_message(&self, conversation_id: &ConversationId, message_id: &MessageId) -> bool {
        self.conversation(conversation_id)
            .and_then(|c| c.message(message_id))
            .is_some()
    }

    /// Replace a streaming message's content. No-op if the message is gone.
    pub fn update_message(
        &mut self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        content: &str,
    ) -> bool {
        match self
            .conversation_mut(conversation_id)
            .and_then(|c| c.message_mut(message_id))
        {
            Some(message) => {
                message.content.clear();
                message.content.push_str(content);
                true
            }
            None => false,
        }
    }

    /// Mark a message as no longer streaming, optionally replacing its content.
    pub fn finalize_message(
        &mut self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        content: Option<&str>,
    ) -> bool {
        match self
            .conversation_mut(conversation_id)
            .and_then(|c| c.message_mut(message_id))
        {
            Some(message) => {
                if let Some(content) = content {
                    message.content = content.to_string();
                }
                message.is_streaming = false;
                true
            }
            None => false,
        }
    }

    /// Empty the current view, starting a fresh conversation if one was active.
    ///
    /// Returns the id of the new conversation, if one was created.
    pub fn clear_chat(&mut self) -> Option<ConversationId> {
        let active = self.active_conversation()?;
        if active.is_empty() {
            return None;
        }

        let conversation = Conversation::new();
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.active_conversation_id = Some(id.clone());
        Some(id)
    }

    pub fn select_conversation(&mut self, id: &ConversationId) -> Result<(), SessionError> {
        if self.conversation(id).is_none() {
            return Err(SessionError::UnknownConversation(id.clone()));
        }
        self.active_conversation_id = Some(id.clone());
        Ok(())
    }

    /// Remove a conversation. Returns true if it was the active one.
    pub fn delete_conversation(&mut self, id: &ConversationId) -> Result<bool, SessionError> {
        let position = self
            .conversations
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| SessionError::UnknownConversation(id.clone()))?;
        self.conversations.remove(position);

        let was_active = self.active_conversation_id.as_ref() == Some(id);
        if was_active {
            self.active_conversation_id = None;
        }
        Ok(was_active)
    }

    pub fn clear_all_history(&mut self) {
        self.conversations.clear();
        self.active_conversation_id = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            conversations: history::sorted_newest_first(&self.conversations),
            active_conversation_id: self.active_conversation_id.clone(),
            current_messages: self.current_messages(),
            selected_model: self.config.selected_model,
            is_loading: self.is_loading,
            chain_length: self.config.chain_length,
            ollama: self.config.ollama.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SessionState {
        SessionState::new(SessionConfig::default()).unwrap()
    }

    fn send_and_finish(state: &mut SessionState, content: &str) -> PendingReply {
        let pending = state.begin_send(content).unwrap();
        state.finalize_message(
            &pending.conversation_id,
            &pending.assistant_message.id,
            Some("reply"),
        );
        state.set_loading(false);
        pending
    }

    #[test]
    fn test_rejects_invalid_chain_length() {
        let config = SessionConfig {
            chain_length: 0,
            ..SessionConfig::default()
        };
        assert!(SessionState::new(config).is_err());
    }

    #[test]
    fn test_first_send_creates_active_conversation() {
        let mut state = state();
        let pending = state.begin_send("hello").unwrap();

        assert!(pending.created_conversation);
        assert_eq!(state.active_conversation_id(), Some(&pending.conversation_id));
        assert!(state.is_loading());

        let messages = state.current_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, pending.user_message.id);
        assert_eq!(messages[1].id, pending.assistant_message.id);
        assert!(messages[1].is_streaming);
        assert_eq!(state.active_conversation().unwrap().title, "hello");
    }

    #[test]
    fn test_begin_send_refused_while_loading() {
        let mut state = state();
        state.begin_send("first").unwrap();
        assert!(state.begin_send("second").is_none());
        assert_eq!(state.current_messages().len(), 2);
    }

    #[test]
    fn test_second_send_appends_to_same_conversation() {
        let mut state = state();
        let first = send_and_finish(&mut state, "one");
        let second = send_and_finish(&mut state, "two");

        assert!(!second.created_conversation);
        assert_eq!(first.conversation_id, second.conversation_id);
        assert_eq!(state.conversations().len(), 1);
        assert_eq!(state.current_messages().len(), 4);
    }

    #[test]
    fn test_update_after_delete_does_not_resurrect() {
        let mut state = state();
        let pending = state.begin_send("hello").unwrap();
        state.delete_conversation(&pending.conversation_id).unwrap();

        assert!(!state.update_message(
            &pending.conversation_id,
            &pending.assistant_message.id,
            "partial"
        ));
        assert!(state.conversations().is_empty());
        assert!(state.current_messages().is_empty());
    }

    #[test]
    fn test_clear_chat_reuses_empty_conversation() {
        let mut state = state();
        send_and_finish(&mut state, "hello");

        let fresh = state.clear_chat().unwrap();
        assert_eq!(state.active_conversation_id(), Some(&fresh));
        assert!(state.current_messages().is_empty());
        assert_eq!(state.conversations().len(), 2);

        assert!(state.clear_chat().is_none());
        assert_eq!(state.conversations().len(), 2);
    }

    #[test]
    fn test_clear_chat_without_active_is_noop() {
        let mut state = state();
        assert!(state.clear_chat().is_none());
        assert!(state.conversations().is_empty());
    }

    #[test]
    fn test_pending_reply_uses_persona_reveal_delay() {
        let mut state = state();
        state.set_selected_model(ModelTag::Ollama);
        let pending = state.begin_send("hello").unwrap();
        assert_eq!(pending.reveal_delay, ModelTag::Ollama.reveal_delay());

        let config = SessionConfig {
            reveal_delay: Some(Duration::from_millis(1)),
            ..SessionConfig::default()
        };
        let mut state = SessionState::new(config).unwrap();
        let pending = state.begin_send("hello").unwrap();
        assert_eq!(pending.reveal_delay, Duration::from_millis(1));
    }

    #[test]
    fn test_context_messages_respects_chain_length() {
        let mut state = state();
        state.set_chain_length(3).unwrap();
        send_and_finish(&mut state, "one");
        send_and_finish(&mut state, "two");

        let context = state.context_messages();
        assert_eq!(context.len(), 3);
        assert_eq!(context[0].content, "reply");
        assert_eq!(context[1].content, "two");

        assert!(state.set_chain_length(11).is_err());
        assert_eq!(state.chain_length(), 3);
    }
}
