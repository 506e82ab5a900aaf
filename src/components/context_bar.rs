use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::AppState;

use super::Component;

pub struct ContextBar;

impl Component for ContextBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let ws_label = if state.diff.options.ignore_whitespace {
            "[ws:off]"
        } else {
            "[ws:on]"
        };

        let (files, lines) = state.diff.selection_summary();
        let summary = match (files, lines) {
            (0, _) => "nothing selected".to_string(),
            (1, l) => format!("{l} lines in 1 file"),
            (f, l) => format!("{l} lines in {f} files"),
        };

        let mut spans = vec![
            Span::styled(
                " linepick ",
                Style::default().fg(Color::Black).bg(theme.accent),
            ),
            Span::raw("  "),
            Span::styled(
                state.branch_label.as_str(),
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" \u{2190} ", Style::default().fg(theme.text_muted)),
            Span::styled(
                summary,
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(ws_label, Style::default().fg(theme.text_muted)),
        ];
        if state.diff.loading {
            spans.push(Span::styled(
                "  loading\u{2026}",
                Style::default().fg(theme.text_muted),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}
