use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::DiffSelectionType;
use crate::state::{app_state::FocusPanel, AppState};

use super::Component;

pub struct Navigator;

impl Navigator {
    /// Index into the visible entries of the first listed row, given the
    /// inner height of the panel.
    pub fn scroll_for(selected: usize, inner_height: usize) -> usize {
        if inner_height > 0 && selected >= inner_height {
            selected - inner_height + 1
        } else {
            0
        }
    }
}

impl Component for Navigator {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let is_focused = state.focus == FocusPanel::Navigator;
        let theme = &state.theme;

        let border_style = if is_focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let entries = &state.navigator.entries;
        let block = Block::default()
            .title(format!(" Files ({}) ", entries.len()))
            .borders(Borders::ALL)
            .border_style(border_style);

        if entries.is_empty() {
            let paragraph = Paragraph::new(" No changes")
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;
        // "▶ " + "[x] "
        let max_display_width = inner_width.saturating_sub(6);
        let selected = state.navigator.selected;
        let scroll = Self::scroll_for(selected, inner_height);

        let lines: Vec<Line> = entries
            .iter()
            .enumerate()
            .skip(scroll)
            .take(inner_height)
            .map(|(idx, entry)| {
                let is_selected = idx == selected;
                let is_active = state.diff.selected_file == Some(entry.delta_index);

                let style = if is_selected {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                        .bg(theme.selection_bg)
                } else if is_active {
                    Style::default().fg(theme.text).bg(theme.surface)
                } else {
                    Style::default().fg(theme.text)
                };

                let prefix = if is_selected { "\u{25b6}" } else { " " };

                let (check, check_color) = match state
                    .diff
                    .deltas
                    .get(entry.delta_index)
                    .map(|d| state.diff.selection_type_of(d))
                {
                    Some(DiffSelectionType::All) => ("[x]", theme.gutter_included),
                    Some(DiffSelectionType::Partial) => ("[-]", theme.warning),
                    _ => ("[ ]", theme.text_muted),
                };

                // Truncate from the left so the filename stays visible
                let char_count = entry.display.chars().count();
                let display = if char_count > max_display_width && max_display_width > 1 {
                    let skip = char_count - (max_display_width - 1);
                    let truncated: String = entry.display.chars().skip(skip).collect();
                    format!("\u{2026}{truncated}")
                } else {
                    entry.display.clone()
                };

                Line::from(vec![
                    Span::styled(format!("{prefix} "), style),
                    Span::styled(format!("{check} "), Style::default().fg(check_color)),
                    Span::styled(display, style),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }
}
