//! The conversation session manager.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use aiti_client::{GenerateError, ResponseSource};
use aiti_core::{
    Conversation, ConversationId, Message, MessageId, ModelTag, OllamaConfig, SessionConfig,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::emitter::{RevealOutcome, RevealSink, StreamingEmitter};
use crate::error::SessionError;
use crate::event::{Notice, NoticeLevel, SessionEvent};
use crate::history;
use crate::state::{PendingReply, SessionSnapshot, SessionState};

/// Content written into an assistant message whose generation failed.
pub const GENERATION_ERROR_MESSAGE: &str =
    "Sorry, I couldn't generate a response. Please check your connection and try again.";

/// Capacity of the event channel.
const EVENT_CAPACITY: usize = 1024;

/// Why a send was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Content was empty or whitespace.
    EmptyInput,
    /// Another generation is still in flight.
    Busy,
}

/// Result of [`SessionManager::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was recorded.
    Ignored(IgnoreReason),
    /// The reply was fully revealed.
    Completed {
        conversation_id: ConversationId,
        message_id: MessageId,
    },
    /// Generation failed; the reply holds [`GENERATION_ERROR_MESSAGE`].
    Failed {
        conversation_id: ConversationId,
        message_id: MessageId,
        error: String,
    },
    /// The reply's conversation was removed before the reveal finished.
    Cancelled {
        conversation_id: ConversationId,
        message_id: MessageId,
    },
}

/// Handle to a chat session.
///
/// Cloning is cheap; all clones share the same state. The state lock is only
/// held inside synchronous steps, never across an await point.
#[derive(Clone)]
pub struct SessionManager {
    state: Arc<Mutex<SessionState>>,
    source: Arc<dyn ResponseSource>,
    clipboard: Arc<dyn Clipboard>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create a session from its configuration.
    pub fn new(
        config: SessionConfig,
        source: Arc<dyn ResponseSource>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Result<Self, SessionError> {
        let state = SessionState::new(config)?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            source,
            clipboard,
            events,
        })
    }

    /// Subscribe to state change events.
    ///
    /// Each revealed character is one `MessageUpdated` event, so a slow
    /// subscriber may lag and miss partial updates. `MessageFinalized` always
    /// carries the complete text.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Messages of the active conversation.
    pub fn current_messages(&self) -> Vec<Message> {
        self.lock().current_messages()
    }

    pub fn conversation(&self, id: &ConversationId) -> Option<Conversation> {
        self.lock().conversation(id).cloned()
    }

    /// Conversations ordered newest first.
    pub fn conversations(&self) -> Vec<Conversation> {
        history::sorted_newest_first(self.lock().conversations())
    }

    pub fn active_conversation_id(&self) -> Option<ConversationId> {
        self.lock().active_conversation_id().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading()
    }

    pub fn selected_model(&self) -> ModelTag {
        self.lock().selected_model()
    }

    /// Change the persona used for future sends.
    ///
    /// Messages already in flight keep the persona they were sent with.
    pub fn set_selected_model(&self, model: ModelTag) {
        let mut state = self.lock();
        state.set_selected_model(model);
        info!(model = %model, "Selected model changed");
        self.publish(SessionEvent::ModelChanged(model));
    }

    pub fn chain_length(&self) -> u8 {
        self.lock().chain_length()
    }

    pub fn set_chain_length(&self, length: u8) -> Result<(), SessionError> {
        self.lock().set_chain_length(length)?;
        debug!(chain_length = length, "Chain length changed");
        Ok(())
    }

    pub fn set_ollama_config(&self, config: OllamaConfig) {
        debug!(base_url = %config.base_url, model = %config.model, "Ollama config changed");
        self.lock().set_ollama(config);
    }

    /// Last `chain_length` finalized messages of the active conversation.
    pub fn context_messages(&self) -> Vec<Message> {
        self.lock().context_messages()
    }

    /// Check the Ollama endpoint and raise a notice with the result.
    pub async fn check_ollama(&self) -> bool {
        let config = self.lock().ollama().clone();
        let notice = match self.source.health(&config).await {
            Ok(true) => {
                info!(base_url = %config.base_url, "Ollama is reachable");
                Notice::info(
                    "Ollama connected",
                    format!("Using {} at {}.", config.model, config.base_url),
                )
            }
            Ok(false) => {
                warn!(base_url = %config.base_url, "Ollama health check failed");
                Notice::error(
                    "Ollama unavailable",
                    format!("{} did not answer the health check.", config.base_url),
                )
            }
            Err(err) => {
                warn!(base_url = %config.base_url, error = %err, "Ollama health check failed");
                Notice::error("Ollama unavailable", err.to_string())
            }
        };
        let healthy = notice.level == NoticeLevel::Info;
        self.publish(SessionEvent::Notice(notice));
        healthy
    }

    /// Send a user message and reveal the assistant reply.
    ///
    /// Never panics or returns an error: empty input and concurrent sends are
    /// ignored, and generation failures are written into the reply message.
    pub async fn send_message(&self, content: &str) -> SendOutcome {
        if content.trim().is_empty() {
            debug!("Ignoring empty message");
            return SendOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        let Some(pending) = self.begin_send(content) else {
            warn!("Generation already in flight, ignoring send");
            return SendOutcome::Ignored(IgnoreReason::Busy);
        };

        let conversation_id = pending.conversation_id.clone();
        let message_id = pending.assistant_message.id.clone();
        let model = pending.model();
        info!(
            conversation_id = %conversation_id,
            message_id = %message_id,
            model = %model,
            "Generating reply"
        );

        let outcome = match self.source.generate(model, content, &pending.ollama).await {
            Ok(text) => self.reveal_reply(&pending, &text).await,
            Err(err) => self.fail_reply(&pending, err),
        };

        let mut state = self.lock();
        state.set_loading(false);
        self.publish(SessionEvent::LoadingChanged(false));
        drop(state);

        outcome
    }

    /// Empty the current view; starts a fresh conversation if one was active.
    pub fn clear_chat(&self) {
        let mut state = self.lock();
        if let Some(id) = state.clear_chat() {
            info!(conversation_id = %id, "Started new conversation");
            self.publish(SessionEvent::HistoryChanged);
            self.publish(SessionEvent::ActiveConversationChanged(Some(id)));
        }
    }

    /// Make a conversation active. Unknown ids leave the state unchanged.
    pub fn select_conversation(&self, id: &ConversationId) -> Result<(), SessionError> {
        let mut state = self.lock();
        if let Err(err) = state.select_conversation(id) {
            debug!(conversation_id = %id, "Select ignored: unknown conversation");
            return Err(err);
        }
        self.publish(SessionEvent::ActiveConversationChanged(Some(id.clone())));
        Ok(())
    }

    /// Remove a conversation from history.
    pub fn delete_conversation(&self, id: &ConversationId) -> Result<(), SessionError> {
        let mut state = self.lock();
        let was_active = match state.delete_conversation(id) {
            Ok(was_active) => was_active,
            Err(err) => {
                debug!(conversation_id = %id, "Delete ignored: unknown conversation");
                return Err(err);
            }
        };
        info!(conversation_id = %id, was_active, "Deleted conversation");
        self.publish(SessionEvent::HistoryChanged);
        if was_active {
            self.publish(SessionEvent::ActiveConversationChanged(None));
        }
        Ok(())
    }

    /// Remove every conversation.
    pub fn clear_all_history(&self) {
        let mut state = self.lock();
        state.clear_all_history();
        info!("Cleared all history");
        self.publish(SessionEvent::HistoryChanged);
        self.publish(SessionEvent::ActiveConversationChanged(None));
    }

    /// Copy a conversation to the clipboard as text.
    ///
    /// Failures are logged and raised as a notice.
    pub fn share_conversation(&self, id: &ConversationId) -> Result<String, SessionError> {
        let Some(conversation) = self.conversation(id) else {
            warn!(conversation_id = %id, "Share failed: unknown conversation");
            self.publish(SessionEvent::Notice(Notice::error(
                "Share failed",
                "Conversation not found.",
            )));
            return Err(SessionError::UnknownConversation(id.clone()));
        };

        let text = history::share_text(&conversation);
        if let Err(err) = self.clipboard.write_text(&text) {
            warn!(conversation_id = %id, error = %err, "Share failed");
            self.publish(SessionEvent::Notice(Notice::error(
                "Share failed",
                "Could not copy the conversation to the clipboard.",
            )));
            return Err(SessionError::Clipboard(err.to_string()));
        }

        info!(conversation_id = %id, len = text.len(), "Shared conversation");
        self.publish(SessionEvent::Notice(Notice::info(
            "Copied to clipboard",
            "Conversation copied to clipboard.",
        )));
        Ok(text)
    }

    fn begin_send(&self, content: &str) -> Option<PendingReply> {
        let mut state = self.lock();
        let pending = state.begin_send(content)?;

        if pending.created_conversation {
            info!(conversation_id = %pending.conversation_id, "Created conversation");
            self.publish(SessionEvent::HistoryChanged);
            self.publish(SessionEvent::ActiveConversationChanged(Some(
                pending.conversation_id.clone(),
            )));
        }
        self.publish(SessionEvent::MessageAppended {
            conversation_id: pending.conversation_id.clone(),
            message: pending.user_message.clone(),
        });
        self.publish(SessionEvent::MessageAppended {
            conversation_id: pending.conversation_id.clone(),
            message: pending.assistant_message.clone(),
        });
        self.publish(SessionEvent::LoadingChanged(true));
        Some(pending)
    }

    async fn reveal_reply(&self, pending: &PendingReply, text: &str) -> SendOutcome {
        let conversation_id = pending.conversation_id.clone();
        let message_id = pending.assistant_message.id.clone();

        let mut sink = MessageSink {
            manager: self,
            conversation_id: &conversation_id,
            message_id: &message_id,
        };
        let outcome = StreamingEmitter::new(pending.reveal_delay)
            .reveal(text, &mut sink)
            .await;

        match outcome {
            RevealOutcome::Completed { emitted } => {
                let mut state = self.lock();
                if state.finalize_message(&conversation_id, &message_id, None) {
                    self.publish(SessionEvent::MessageFinalized {
                        conversation_id: conversation_id.clone(),
                        message_id: message_id.clone(),
                        content: text.to_string(),
                    });
                    debug!(message_id = %message_id, emitted, "Reply complete");
                    SendOutcome::Completed {
                        conversation_id,
                        message_id,
                    }
                } else {
                    debug!(message_id = %message_id, "Reply removed before finalizing");
                    SendOutcome::Cancelled {
                        conversation_id,
                        message_id,
                    }
                }
            }
            RevealOutcome::Cancelled { emitted } => {
                info!(message_id = %message_id, emitted, "Reply removed during reveal");
                SendOutcome::Cancelled {
                    conversation_id,
                    message_id,
                }
            }
        }
    }

    fn fail_reply(&self, pending: &PendingReply, err: GenerateError) -> SendOutcome {
        let conversation_id = pending.conversation_id.clone();
        let message_id = pending.assistant_message.id.clone();
        warn!(
            conversation_id = %conversation_id,
            message_id = %message_id,
            error = %err,
            "Generation failed"
        );

        let mut state = self.lock();
        if state.finalize_message(&conversation_id, &message_id, Some(GENERATION_ERROR_MESSAGE)) {
            self.publish(SessionEvent::MessageUpdated {
                conversation_id: conversation_id.clone(),
                message_id: message_id.clone(),
                content: GENERATION_ERROR_MESSAGE.to_string(),
            });
            self.publish(SessionEvent::MessageFinalized {
                conversation_id: conversation_id.clone(),
                message_id: message_id.clone(),
                content: GENERATION_ERROR_MESSAGE.to_string(),
            });
        }
        self.publish(SessionEvent::Notice(Notice::error(
            "Generation failed",
            err.to_string(),
        )));
        drop(state);

        SendOutcome::Failed {
            conversation_id,
            message_id,
            error: err.to_string(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Writes revealed prefixes into one assistant message.
struct MessageSink<'a> {
    manager: &'a SessionManager,
    conversation_id: &'a ConversationId,
    message_id: &'a MessageId,
}

impl RevealSink for MessageSink<'_> {
    fn is_live(&self) -> bool {
        self.manager
            .lock()
            .has_message(self.conversation_id, self.message_id)
    }

    fn emit(&mut self, partial: &str) {
        let mut state = self.manager.lock();
        if state.update_message(self.conversation_id, self.message_id, partial) {
            self.manager.publish(SessionEvent::MessageUpdated {
                conversation_id: self.conversation_id.clone(),
                message_id: self.message_id.clone(),
                content: partial.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use aiti_client::CannedSource;

    use super::*;
    use crate::clipboard::MemoryClipboard;

    fn manager() -> SessionManager {
        let config = SessionConfig {
            reveal_delay: Some(Duration::ZERO),
            ..SessionConfig::default()
        };
        SessionManager::new(config, Arc::new(CannedSource), Arc::new(MemoryClipboard::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_input_is_ignored() {
        let session = manager();
        for content in ["", "   ", "\n\t"] {
            assert_eq!(
                session.send_message(content).await,
                SendOutcome::Ignored(IgnoreReason::EmptyInput)
            );
        }
        assert!(session.conversations().is_empty());
        assert!(session.active_conversation_id().is_none());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_events_follow_send_order() {
        let session = manager();
        let mut rx = session.subscribe();

        session.send_message("hi").await;

        let mut appended = Vec::new();
        let mut first_update_after = None;
        let mut last_event = None;
        while let Ok(event) = rx.try_recv() {
            match &event {
                SessionEvent::MessageAppended { message, .. } => appended.push(message.role),
                SessionEvent::MessageUpdated { .. } if first_update_after.is_none() => {
                    first_update_after = Some(appended.len());
                }
                _ => {}
            }
            last_event = Some(event);
        }

        assert_eq!(
            appended,
            vec![aiti_core::Role::User, aiti_core::Role::Assistant]
        );
        assert_eq!(first_update_after, Some(2));
        assert!(matches!(last_event, Some(SessionEvent::LoadingChanged(false))));
    }

    #[tokio::test]
    async fn test_model_is_snapshotted_at_send() {
        let session = manager();
        session.set_selected_model(ModelTag::AitiPro);
        let send = session.send_message("q");
        let switch = async {
            tokio::task::yield_now().await;
            session.set_selected_model(ModelTag::Aiti);
        };
        let (outcome, _) = tokio::join!(send, switch);

        assert!(matches!(outcome, SendOutcome::Completed { .. }));
        let messages = session.current_messages();
        assert!(messages.iter().all(|m| m.model == ModelTag::AitiPro));
        assert_eq!(session.selected_model(), ModelTag::Aiti);
    }

    #[tokio::test]
    async fn test_share_unknown_conversation() {
        let session = manager();
        let mut rx = session.subscribe();
        let err = session
            .share_conversation(&ConversationId::new("missing"))
            .unwrap_err();

        assert!(matches!(err, SessionError::UnknownConversation(_)));
        assert!(matches!(rx.try_recv(), Ok(SessionEvent::Notice(_))));
    }

    #[test]
    fn test_ollama_config_applies_to_snapshot() {
        let session = manager();
        let config = OllamaConfig {
            base_url: "http://127.0.0.1:9999".to_string(),
            model: "mistral".to_string(),
            timeout: Duration::from_secs(5),
        };
        session.set_ollama_config(config.clone());
        assert_eq!(session.snapshot().ollama, config);
    }

    #[test]
    fn test_invalid_chain_length_keeps_previous() {
        let session = manager();
        assert!(session.set_chain_length(0).is_err());
        assert_eq!(session.chain_length(), 5);
        session.set_chain_length(10).unwrap();
        assert_eq!(session.chain_length(), 10);
    }
}
