//! Chat widget for displaying the active conversation.

use aiti_core::{Message, Role};
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;
use crate::utils::{format_message_time, wrap_text_indented};

/// Renders the messages of one conversation.
#[derive(Debug, Clone)]
pub struct ChatWidget<'a> {
    messages: &'a [Message],
    /// Lines scrolled back from the bottom (0 = follow new output).
    scroll_back: usize,
    theme: Theme,
}

impl<'a> ChatWidget<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            scroll_back: 0,
            theme: Theme::default(),
        }
    }

    pub fn scroll_back(mut self, lines: usize) -> Self {
        self.scroll_back = lines;
        self
    }

    /// Build every line before scrolling is applied.
    fn lines(&self, text_width: usize) -> Vec<Line<'static>> {
        let mut all_lines: Vec<Line> = Vec::new();

        for msg in self.messages {
            let style = match msg.role {
                Role::User => self.theme.user_style(),
                Role::Assistant => self.theme.model_style(msg.model),
            }
            .add_modifier(Modifier::BOLD);

            let mut header = Vec::new();
            if msg.role == Role::Assistant {
                header.push(Span::styled(format!("[{}] ", msg.model.short_name()), style));
            }
            header.extend([
                Span::styled(format!("{}: ", msg.speaker()), style),
                Span::styled(format_message_time(msg.created_at), self.theme.muted_style()),
            ]);
            if msg.is_streaming {
                header.push(Span::styled(" (typing...)", self.theme.muted_style()));
            }
            all_lines.push(Line::from(header));

            for wrapped_line in wrap_text_indented(&msg.content, text_width, "  ") {
                all_lines.push(Line::from(Span::raw(wrapped_line)));
            }

            all_lines.push(Line::from(""));
        }

        all_lines
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = self.theme.unfocused_border();

        let visible_height = area.height.saturating_sub(2) as usize;
        let text_width = area.width.saturating_sub(2) as usize;

        if self.messages.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Start a conversation by typing a message below.",
                    self.theme.muted_style(),
                )),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(" Chat "),
            );
            frame.render_widget(empty, area);
            return;
        }

        let all_lines = self.lines(text_width);
        let total_lines = all_lines.len();

        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll_offset = max_scroll.saturating_sub(self.scroll_back);

        let lines: Vec<Line> = all_lines
            .into_iter()
            .skip(scroll_offset)
            .take(visible_height)
            .collect();

        let first_line = scroll_offset + 1;
        let last_line = (scroll_offset + visible_height).min(total_lines);
        let title = format!(" Chat [{}-{}/{}] ", first_line, last_line, total_lines);

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use aiti_core::ModelTag;

    use super::*;

    #[test]
    fn test_lines_include_speaker_and_typing_marker() {
        let user = Message::user("hello", ModelTag::Ollama);
        let mut reply = Message::assistant_placeholder(ModelTag::Ollama);
        reply.content = "hi".to_string();
        let messages = vec![user, reply];

        let lines = ChatWidget::new(&messages).lines(40);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();

        assert!(text[0].starts_with("You: "));
        assert_eq!(text[1], "  hello");
        assert!(text[3].starts_with("[OL] Ollama: "));
        assert!(text[3].ends_with("(typing...)"));
        assert_eq!(text[4], "  hi");
    }
}
