//! UI state for rendering.

use std::time::{Duration, Instant};

use aiti_core::ConversationId;
use aiti_session::{Notice, SessionSnapshot};

/// How long a notice stays in the footer.
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Which pane receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    History,
}

/// Everything the render pass reads (no async, no locks).
pub struct UiState {
    /// Latest copy of the session.
    pub session: SessionSnapshot,
    pub focus: Focus,
    /// Message being typed.
    pub input: String,
    /// Cursor position in chars.
    pub input_cursor: usize,
    /// Selected row in the history list.
    pub history_index: usize,
    /// Lines scrolled back from the bottom of the chat.
    pub chat_scroll_back: usize,
    notice: Option<(Notice, Instant)>,
    pub show_quit_confirm: bool,
}

impl UiState {
    pub fn new(session: SessionSnapshot) -> Self {
        Self {
            session,
            focus: Focus::default(),
            input: String::new(),
            input_cursor: 0,
            history_index: 0,
            chat_scroll_back: 0,
            notice: None,
            show_quit_confirm: false,
        }
    }

    /// Replace the session copy, keeping the history selection in range.
    pub fn refresh(&mut self, session: SessionSnapshot) {
        self.session = session;
        let len = self.session.conversations.len();
        if self.history_index >= len {
            self.history_index = len.saturating_sub(1);
        }
    }

    pub fn selected_conversation_id(&self) -> Option<ConversationId> {
        self.session
            .conversations
            .get(self.history_index)
            .map(|c| c.id.clone())
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    /// Notice still within its display time.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|(_, at)| at.elapsed() < NOTICE_TTL)
            .map(|(notice, _)| notice)
    }

    pub fn can_send(&self) -> bool {
        !self.session.is_loading && !self.input.trim().is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.byte_offset(self.input_cursor);
        self.input.insert(byte_pos, c);
        self.input_cursor += 1;
    }

    pub fn delete_char_before_cursor(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        let byte_pos = self.byte_offset(self.input_cursor);
        self.input.remove(byte_pos);
    }

    pub fn move_cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.input_cursor = (self.input_cursor + 1).min(self.input.chars().count());
    }

    /// Take the typed message, clearing the input.
    pub fn take_input(&mut self) -> String {
        self.input_cursor = 0;
        self.chat_scroll_back = 0;
        std::mem::take(&mut self.input)
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}
