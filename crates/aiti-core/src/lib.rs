//! AITI Chat Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Async runtimes
//! - Terminal or clipboard access
//!
//! All types here represent the chat domain: personas, messages,
//! conversations and the configuration a session is built from.

pub mod config;
pub mod conversation;
pub mod error;
pub mod ids;
pub mod message;
pub mod model;

// Re-export commonly used types
pub use config::{OllamaConfig, SessionConfig, MAX_CHAIN_LENGTH, MIN_CHAIN_LENGTH};
pub use conversation::{Conversation, PLACEHOLDER_TITLE, TITLE_MAX_CHARS};
pub use error::CoreError;
pub use ids::{ConversationId, MessageId};
pub use message::{Message, Role};
pub use model::ModelTag;
