use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::diff_rows::{build_rows, DiffRow};
use crate::git::types::{DiffLineOrigin, FileDelta};
use crate::gutter::GutterRow;
use crate::state::{app_state::FocusPanel, AppState};
use crate::theme::Theme;

use super::Component;

/// Columns taken by the gutter: marker (2), old lineno (5), new lineno (5),
/// separator (1).
pub const GUTTER_WIDTH: u16 = 13;

const MARKER: &str = "\u{258c} ";

pub struct DiffView;

impl Component for DiffView {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let is_focused = state.focus == FocusPanel::DiffView;
        let theme = &state.theme;

        let border_style = if is_focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let Some(delta) = state.diff.selected_delta() else {
            let block = Block::default()
                .title(" Diff ")
                .borders(Borders::ALL)
                .border_style(border_style);

            let content = if state.diff.loading {
                " Loading..."
            } else if state.diff.deltas.is_empty() {
                " Nothing to commit, working tree clean"
            } else {
                " Select a file to view diff"
            };

            let paragraph = Paragraph::new(content)
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let block = Block::default()
            .title(format_title(delta, state))
            .borders(Borders::ALL)
            .border_style(border_style);

        if delta.binary || delta.hunks.is_empty() {
            let msg = if delta.binary {
                " Binary file differs (whole-file selection only)"
            } else {
                " No textual changes"
            };
            let paragraph = Paragraph::new(msg)
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = build_lines(
            delta,
            state,
            state.diff.scroll_offset,
            inner.height as usize,
            is_focused,
            theme,
        );
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn format_title(delta: &FileDelta, state: &AppState) -> String {
    let path_display = delta.path.to_string_lossy();
    let (selected, total) = state
        .diff
        .current_selection()
        .map(|s| {
            (
                s.selected_rows().count(),
                s.selectable_rows().map_or(0, |r| r.len()),
            )
        })
        .unwrap_or((0, 0));
    match delta.old_path {
        Some(ref old_path) if *old_path != delta.path => format!(
            " {} \u{2192} {path_display} [{selected}/{total}] ",
            old_path.to_string_lossy()
        ),
        _ => format!(" {path_display} [{selected}/{total}] "),
    }
}

fn build_lines<'a>(
    delta: &'a FileDelta,
    state: &AppState,
    scroll: usize,
    height: usize,
    is_focused: bool,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let gutter = &state.diff.gutter;

    build_rows(delta)
        .into_iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(index, row)| {
            let is_cursor = is_focused && index == state.diff.cursor_row;
            let marked = gutter.is_marked(index);
            let mut spans = gutter_spans(gutter.row(index), &row, marked, theme);

            match row {
                DiffRow::HunkHeader { hunk, .. } => {
                    spans.push(Span::styled(
                        format!(" {}", hunk.header),
                        Style::default().fg(theme.diff_hunk_header_fg),
                    ));
                }
                DiffRow::Line { line, .. } => {
                    let text = line.text();
                    let (prefix, style) = match line.origin {
                        DiffLineOrigin::Addition => (
                            '+',
                            Style::default().fg(theme.diff_add_fg).bg(theme.diff_add_bg),
                        ),
                        DiffLineOrigin::Deletion => (
                            '-',
                            Style::default().fg(theme.diff_del_fg).bg(theme.diff_del_bg),
                        ),
                        DiffLineOrigin::Context => {
                            (' ', Style::default().fg(theme.diff_context_fg))
                        }
                    };
                    // Excluded changes are drawn dimmed.
                    let style = if line.is_change() && !marked {
                        Style::default()
                            .fg(theme.text_muted)
                            .add_modifier(Modifier::CROSSED_OUT)
                    } else {
                        style
                    };
                    spans.push(Span::styled(format!("{prefix}{text}"), style));
                }
            }

            let line = Line::from(spans);
            if is_cursor {
                line.style(Style::default().bg(theme.cursor_bg))
            } else {
                line
            }
        })
        .collect()
}

fn gutter_spans<'a>(
    gutter_row: Option<&GutterRow>,
    row: &DiffRow<'_>,
    marked: bool,
    theme: &Theme,
) -> Vec<Span<'a>> {
    let marker = if row.is_selectable() {
        let color = if marked {
            theme.gutter_included
        } else {
            theme.gutter_excluded
        };
        Span::styled(MARKER, Style::default().fg(color))
    } else {
        Span::raw("  ")
    };

    let lineno = |n: Option<u32>| n.map_or_else(|| "     ".to_string(), |n| format!("{n:>4} "));
    let (old, new) = gutter_row.map_or((None, None), |g| (g.old_lineno, g.new_lineno));
    let numbers_style = Style::default().fg(theme.gutter_fg);

    vec![
        marker,
        Span::styled(lineno(old), numbers_style),
        Span::styled(lineno(new), numbers_style),
        Span::styled("\u{2502}", numbers_style),
    ]
}

/// Map a terminal cell to a diff row.
///
/// `area` is the whole diff view including its border. With `gutter_only`
/// the pointer must be over the gutter columns of a visible row; without it
/// (used while dragging) any column counts and rows above or below the view
/// clamp to the first or last visible row.
pub fn row_at(
    area: Rect,
    scroll: usize,
    row_count: usize,
    column: u16,
    row: u16,
    gutter_only: bool,
) -> Option<usize> {
    let inner_top = area.y + 1;
    let inner_height = area.height.saturating_sub(2);
    if inner_height == 0 || row_count == 0 {
        return None;
    }
    let inner_bottom = inner_top + inner_height - 1;

    let offset = if gutter_only {
        let inner_left = area.x + 1;
        let in_gutter = column >= inner_left && column < inner_left + GUTTER_WIDTH;
        if !in_gutter || row < inner_top || row > inner_bottom {
            return None;
        }
        row - inner_top
    } else {
        row.clamp(inner_top, inner_bottom) - inner_top
    };

    let index = scroll + offset as usize;
    if gutter_only && index >= row_count {
        return None;
    }
    Some(index.min(row_count - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect {
        x: 20,
        y: 1,
        width: 60,
        height: 12,
    };

    #[test]
    fn test_row_at_requires_gutter_for_press() {
        // first inner row, first gutter column
        assert_eq!(row_at(AREA, 0, 50, 21, 2, true), Some(0));
        assert_eq!(row_at(AREA, 5, 50, 33, 4, true), Some(7));
        // content column
        assert_eq!(row_at(AREA, 0, 50, 34, 4, true), None);
        // border
        assert_eq!(row_at(AREA, 0, 50, 21, 1, true), None);
        // below the last diff row
        assert_eq!(row_at(AREA, 0, 3, 21, 8, true), None);
    }

    #[test]
    fn test_row_at_clamps_while_dragging() {
        assert_eq!(row_at(AREA, 10, 50, 70, 0, false), Some(10));
        assert_eq!(row_at(AREA, 10, 50, 0, 40, false), Some(19));
        assert_eq!(row_at(AREA, 0, 4, 70, 40, false), Some(3));
    }

    #[test]
    fn test_row_at_empty_diff() {
        assert_eq!(row_at(AREA, 0, 0, 21, 2, false), None);
    }
}
