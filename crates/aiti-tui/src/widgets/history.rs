//! Sidebar listing past conversations.

use aiti_core::{Conversation, ConversationId};
use aiti_session::history::display_title;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;
use crate::utils::{format_history_date, truncate};

/// Conversation list, newest first.
pub struct HistoryWidget<'a> {
    conversations: &'a [Conversation],
    active: Option<&'a ConversationId>,
    selected: usize,
    focused: bool,
    theme: Theme,
}

impl<'a> HistoryWidget<'a> {
    pub fn new(conversations: &'a [Conversation]) -> Self {
        Self {
            conversations,
            active: None,
            selected: 0,
            focused: false,
            theme: Theme::default(),
        }
    }

    pub fn active(mut self, active: Option<&'a ConversationId>) -> Self {
        self.active = active;
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Chat History ");

        if self.conversations.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(" No conversations yet", self.theme.muted_style())),
                Line::from(Span::styled(
                    " Your chat history will appear here",
                    self.theme.muted_style(),
                )),
            ])
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let title_width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .conversations
            .iter()
            .map(|conversation| {
                let marker = if Some(&conversation.id) == self.active {
                    "* "
                } else {
                    "  "
                };
                let mut title_style = self.theme.user_style();
                if Some(&conversation.id) == self.active {
                    title_style = title_style.add_modifier(Modifier::BOLD);
                }
                ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(marker),
                        Span::styled(truncate(display_title(conversation), title_width), title_style),
                    ]),
                    Line::from(Span::styled(
                        format!("  {}", format_history_date(conversation.last_activity())),
                        self.theme.muted_style(),
                    )),
                ])
            })
            .collect();

        let mut list_state = ListState::default();
        if self.focused {
            list_state.select(Some(self.selected.min(self.conversations.len() - 1)));
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style());
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}
