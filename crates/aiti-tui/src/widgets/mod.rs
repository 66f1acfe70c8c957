//! Widgets for the chat client.

pub mod chat;
pub mod history;

pub use chat::ChatWidget;
pub use history::HistoryWidget;
