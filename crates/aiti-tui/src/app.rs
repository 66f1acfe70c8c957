//! Application state and main event loop.

use std::time::Duration;

use aiti_session::SessionManager;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::event::{BackendCommand, UiEvent};
use crate::render;
use crate::state::{Focus, UiState};

/// Main application with UI state and channel handles.
pub struct App {
    state: UiState,

    /// Read-only handle for snapshots; mutations go through the backend.
    session: SessionManager,

    /// Receiver for events from the backend.
    ui_rx: mpsc::Receiver<UiEvent>,

    /// Sender for commands to the backend.
    cmd_tx: mpsc::Sender<BackendCommand>,
}

impl App {
    pub fn new(
        session: SessionManager,
        ui_rx: mpsc::Receiver<UiEvent>,
        cmd_tx: mpsc::Sender<BackendCommand>,
    ) -> Self {
        Self {
            state: UiState::new(session.snapshot()),
            session,
            ui_rx,
            cmd_tx,
        }
    }

    /// Run the main event loop.
    ///
    /// Redraws from a fresh session snapshot every frame, so streamed text
    /// shows up without a dedicated event per character.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            self.state.refresh(self.session.snapshot());
            terminal.draw(|frame| render::render(frame, &self.state))?;

            // Poll terminal events (non-blocking with short timeout)
            if event::poll(Duration::from_millis(30))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        break; // quit requested
                    }
                }
            }

            // Process backend events (non-blocking)
            while let Ok(event) = self.ui_rx.try_recv() {
                match event {
                    UiEvent::Notice(notice) => self.state.set_notice(notice),
                }
            }
        }

        // Send quit command to backend
        let _ = self.cmd_tx.blocking_send(BackendCommand::Quit);

        Ok(())
    }

    fn send(&self, cmd: BackendCommand) {
        if let Err(e) = self.cmd_tx.try_send(cmd) {
            tracing::warn!(error = %e, "Failed to queue backend command");
        }
    }

    /// Handle a key press.
    ///
    /// Returns true if the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.state.show_quit_confirm {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => true,
                _ => {
                    self.state.show_quit_confirm = false;
                    false
                }
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => self.state.show_quit_confirm = true,
                KeyCode::Char('n') => self.send(BackendCommand::NewChat),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.state.focus = match self.state.focus {
                    Focus::Input => Focus::History,
                    Focus::History => Focus::Input,
                };
            }
            KeyCode::F(2) => {
                let next = self.state.session.selected_model.next();
                self.send(BackendCommand::SetModel(next));
            }
            KeyCode::PageUp => {
                self.state.chat_scroll_back = self.state.chat_scroll_back.saturating_add(10);
            }
            KeyCode::PageDown => {
                self.state.chat_scroll_back = self.state.chat_scroll_back.saturating_sub(10);
            }
            KeyCode::End => self.state.chat_scroll_back = 0,
            _ => match self.state.focus {
                Focus::Input => self.handle_input_key(key.code),
                Focus::History => self.handle_history_key(key.code),
            },
        }
        false
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                // The send affordance is disabled while a reply is in flight
                if self.state.can_send() {
                    let content = self.state.take_input();
                    self.send(BackendCommand::Send(content));
                }
            }
            KeyCode::Char(c) => self.state.insert_char(c),
            KeyCode::Backspace => self.state.delete_char_before_cursor(),
            KeyCode::Left => self.state.move_cursor_left(),
            KeyCode::Right => self.state.move_cursor_right(),
            KeyCode::Esc => self.state.show_quit_confirm = true,
            _ => {}
        }
    }

    fn handle_history_key(&mut self, code: KeyCode) {
        let len = self.state.session.conversations.len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.history_index = self.state.history_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.state.history_index + 1 < len {
                    self.state.history_index += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.state.selected_conversation_id() {
                    self.state.chat_scroll_back = 0;
                    self.send(BackendCommand::Select(id));
                    self.state.focus = Focus::Input;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.state.selected_conversation_id() {
                    self.send(BackendCommand::Delete(id));
                }
            }
            KeyCode::Char('D') => self.send(BackendCommand::ClearAll),
            KeyCode::Char('s') => {
                if let Some(id) = self.state.selected_conversation_id() {
                    self.send(BackendCommand::Share(id));
                }
            }
            KeyCode::Char('n') => self.send(BackendCommand::NewChat),
            KeyCode::Char('m') => {
                let next = self.state.session.selected_model.next();
                self.send(BackendCommand::SetModel(next));
            }
            KeyCode::Char('q') | KeyCode::Esc => self.state.show_quit_confirm = true,
            _ => {}
        }
    }
}
