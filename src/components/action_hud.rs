use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::{app_state::FocusPanel, AppState};

use super::Component;

/// Bottom bar: the latest status message, or the key bindings that apply.
pub struct ActionHud;

impl Component for ActionHud {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;

        if let Some((ref msg, is_error)) = state.status_message {
            let color = if is_error { theme.error } else { theme.success };
            let bar = Paragraph::new(Line::from(vec![
                Span::raw(" "),
                Span::styled(msg.as_str(), Style::default().fg(color)),
            ]))
            .style(Style::default().bg(theme.surface));
            frame.render_widget(bar, area);
            return;
        }

        let bindings: &[(&str, &str)] = match state.focus {
            FocusPanel::Navigator => &[
                ("q", "quit"),
                ("j/k", "file"),
                ("l", "diff"),
                ("a/n", "all/none"),
                ("c", "commit"),
                ("R", "reload"),
            ],
            FocusPanel::DiffView => &[
                ("q", "quit"),
                ("j/k", "line"),
                ("Space", "toggle"),
                ("drag", "select"),
                ("a/n", "all/none"),
                ("h", "files"),
                ("c", "commit"),
            ],
        };

        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("[{key}]"),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                (*desc).to_string(),
                Style::default().fg(theme.text_muted),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}
