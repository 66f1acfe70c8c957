//! Main render function for the TUI.

use aiti_core::ModelTag;
use aiti_session::NoticeLevel;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs};
use ratatui::Frame;

use crate::state::{Focus, UiState};
use crate::theme::Theme;
use crate::widgets::{ChatWidget, HistoryWidget};

/// Width of the history sidebar.
const SIDEBAR_WIDTH: u16 = 32;

/// Render the entire UI.
pub fn render(frame: &mut Frame, state: &UiState) {
    let theme = Theme::default();

    let [header_area, body_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [sidebar_area, chat_area] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
            .areas(body_area);

    render_header(frame, header_area, state, &theme);

    HistoryWidget::new(&state.session.conversations)
        .active(state.session.active_conversation_id.as_ref())
        .selected(state.history_index)
        .focused(state.focus == Focus::History)
        .render(frame, sidebar_area);

    ChatWidget::new(&state.session.current_messages)
        .scroll_back(state.chat_scroll_back)
        .render(frame, chat_area);

    render_input(frame, input_area, state, &theme);
    render_footer(frame, footer_area, state, &theme);

    if state.show_quit_confirm {
        render_quit_confirm(frame, &theme);
    }
}

/// Header with the persona selector.
fn render_header(frame: &mut Frame, area: Rect, state: &UiState, theme: &Theme) {
    let titles: Vec<Line> = ModelTag::all()
        .iter()
        .map(|tag| Line::from(Span::styled(tag.display_name(), theme.model_style(*tag))))
        .collect();
    let selected = ModelTag::all()
        .iter()
        .position(|tag| *tag == state.session.selected_model)
        .unwrap_or(0);

    let title = if state.session.is_loading {
        " AITI Chat - generating... "
    } else {
        " AITI Chat "
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(theme.focused_border().add_modifier(Modifier::BOLD)),
        )
        .select(selected)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    frame.render_widget(tabs, area);
}

/// Message input box with a visible cursor.
fn render_input(frame: &mut Frame, area: Rect, state: &UiState, theme: &Theme) {
    let focused = state.focus == Focus::Input;
    let (title, border_style) = if state.session.is_loading {
        (" Waiting for reply... ", theme.muted_style())
    } else if focused {
        (" Message (Enter to send) ", theme.focused_border())
    } else {
        (" Message ", theme.unfocused_border())
    };

    let input = Paragraph::new(state.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(input, area);

    if focused {
        let x = area.x + 1 + state.input_cursor as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Footer with the latest notice or key help.
fn render_footer(frame: &mut Frame, area: Rect, state: &UiState, theme: &Theme) {
    let line = match state.notice() {
        Some(notice) => {
            let style = match notice.level {
                NoticeLevel::Info => theme.success_style(),
                NoticeLevel::Error => theme.error_style(),
            };
            Line::from(vec![
                Span::styled(format!("{}: ", notice.title), style.add_modifier(Modifier::BOLD)),
                Span::styled(notice.description.clone(), style),
            ])
        }
        None => {
            let help = match state.focus {
                Focus::Input => {
                    " Enter: send | Tab: history | F2: model | Ctrl-N: new chat | PgUp/PgDn: scroll | Esc: quit "
                }
                Focus::History => {
                    " Enter: open | d: delete | D: clear all | s: share | n: new | m: model | Tab: input "
                }
            };
            Line::from(vec![
                Span::styled(
                    format!("Using {} ", state.session.selected_model.display_name()),
                    theme.model_style(state.session.selected_model),
                ),
                Span::raw("|"),
                Span::styled(help, theme.muted_style()),
            ])
        }
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_quit_confirm(frame: &mut Frame, theme: &Theme) {
    let [area] = Layout::vertical([Constraint::Length(5)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::horizontal([Constraint::Length(36)])
        .flex(Flex::Center)
        .areas(area);

    let dialog = Paragraph::new(vec![
        Line::from(""),
        Line::from("  Quit AITI Chat? (y/n)"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.focused_border())
            .title(" Confirm "),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}
