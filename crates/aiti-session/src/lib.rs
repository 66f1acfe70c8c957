//! Conversation session management for AITI Chat.
//!
//! The [`SessionManager`] owns every conversation, the active-conversation
//! pointer and the single in-flight generation. Assistant text is revealed
//! character by character through the [`StreamingEmitter`], and every change
//! is published as a [`SessionEvent`] for the rendering layer.
//!
//! The active conversation is the only store of the current messages;
//! [`SessionManager::current_messages`] is a computed copy of it.

pub mod clipboard;
pub mod emitter;
pub mod error;
pub mod event;
pub mod history;
pub mod manager;
pub mod state;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard};
pub use emitter::{RevealOutcome, RevealSink, StreamingEmitter};
pub use error::SessionError;
pub use event::{Notice, NoticeLevel, SessionEvent};
pub use manager::{IgnoreReason, SendOutcome, SessionManager, GENERATION_ERROR_MESSAGE};
pub use state::{SessionSnapshot, SessionState};
