//! Clipboard access for sharing conversations.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

/// The clipboard rejected a write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("clipboard write rejected: {0}")]
pub struct ClipboardError(pub String);

/// Destination for shared conversation text.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard.
///
/// The clipboard is acquired for a single write and released afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError(e.to_string()))?;
        debug!(len = text.len(), "Wrote text to system clipboard");
        Ok(())
    }
}

/// In-memory clipboard for headless runs and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    reject: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that refuses every write.
    pub fn rejecting() -> Self {
        Self {
            contents: Mutex::new(None),
            reject: true,
        }
    }

    /// Last text written, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.reject {
            return Err(ClipboardError("clipboard unavailable".to_string()));
        }
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}
