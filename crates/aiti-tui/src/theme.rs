//! Theme and style definitions.

use aiti_core::ModelTag;
use ratatui::style::{Color, Modifier, Style};

/// Colors used across the chat client.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Focused borders and highlights
    pub accent: Color,
    /// Info notices
    pub success: Color,
    /// Error notices
    pub error: Color,
    /// Timestamps, hints, secondary text
    pub muted: Color,
    /// User messages
    pub user: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Magenta,
            success: Color::Green,
            error: Color::Red,
            muted: Color::DarkGray,
            user: Color::Cyan,
        }
    }
}

impl Theme {
    /// Style for focused/active borders.
    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Style for unfocused borders.
    pub fn unfocused_border(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for the selected row of a list.
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn user_style(&self) -> Style {
        Style::default().fg(self.user)
    }

    /// Each persona has its own color.
    pub fn model_style(&self, model: ModelTag) -> Style {
        let color = match model {
            ModelTag::Aiti => Color::Magenta,
            ModelTag::AitiPro => Color::Red,
            ModelTag::Ollama => Color::Green,
        };
        Style::default().fg(color)
    }
}
