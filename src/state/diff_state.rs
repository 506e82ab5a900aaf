use std::collections::HashMap;
use std::path::PathBuf;

use crate::diff_rows::{build_rows, hunk_bounds, selectable_rows, DiffRow};
use crate::git::types::FileDelta;
use crate::gutter::{GutterMap, GutterMarker, GutterRow};
use crate::models::{DiffSelection, DiffSelectionType};
use crate::selection::{DragDropSelection, RangeSelection, SelectionStrategy};

#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub ignore_whitespace: bool,
    pub context_lines: u32,
    /// Restrict the diff to these paths (empty = whole work tree).
    pub pathspecs: Vec<String>,
}

impl DiffOptions {
    pub fn new(ignore_whitespace: bool, context_lines: u32, pathspecs: Vec<String>) -> Self {
        Self {
            ignore_whitespace,
            context_lines,
            pathspecs,
        }
    }
}

/// What a click on a diff row acts on.
enum RowTarget {
    Hunk { start: usize, end: usize },
    Change,
    Inert,
}

pub struct DiffState {
    pub options: DiffOptions,
    pub deltas: Vec<FileDelta>,
    pub selected_file: Option<usize>,
    pub scroll_offset: usize,
    pub cursor_row: usize,
    pub viewport_height: usize,
    pub loading: bool,
    /// Line selection per file, keyed by path.
    pub selections: HashMap<PathBuf, DiffSelection>,
    /// Gutter of the file in view.
    pub gutter: GutterMap,
    /// Drag gesture in progress over the gutter.
    pub drag: Option<DragDropSelection>,
}

impl DiffState {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            deltas: Vec::new(),
            selected_file: None,
            scroll_offset: 0,
            cursor_row: 0,
            viewport_height: 20,
            loading: false,
            selections: HashMap::new(),
            gutter: GutterMap::new(),
            drag: None,
        }
    }

    pub fn selected_delta(&self) -> Option<&FileDelta> {
        self.selected_file.and_then(|i| self.deltas.get(i))
    }

    /// Selection of the file in view.
    pub fn current_selection(&self) -> Option<&DiffSelection> {
        self.selected_delta()
            .and_then(|d| self.selections.get(&d.path))
    }

    pub fn selection_type_of(&self, delta: &FileDelta) -> DiffSelectionType {
        self.selections
            .get(&delta.path)
            .map_or(DiffSelectionType::All, DiffSelection::selection_type)
    }

    pub fn row_count(&self) -> usize {
        self.selected_delta()
            .map_or(0, |d| d.hunks.iter().map(|h| h.lines.len() + 1).sum())
    }

    /// Replace the loaded diff. A file keeps its selection only while its
    /// set of changed rows is unchanged; otherwise it goes back to "all".
    pub fn set_deltas(&mut self, deltas: Vec<FileDelta>) {
        let selected_path = self.selected_delta().map(|d| d.path.clone());

        let mut selections = HashMap::with_capacity(deltas.len());
        for delta in &deltas {
            let rows = selectable_rows(delta);
            let selection = match self.selections.remove(&delta.path) {
                Some(prev) if prev.selectable_rows() == Some(&rows) => prev,
                _ => DiffSelection::all().with_selectable_rows(rows),
            };
            selections.insert(delta.path.clone(), selection);
        }
        self.selections = selections;
        self.deltas = deltas;
        self.drag = None;

        let reselect = selected_path
            .and_then(|p| self.deltas.iter().position(|d| d.path == p))
            .or(if self.deltas.is_empty() { None } else { Some(0) });
        match reselect {
            Some(i) if Some(i) == self.selected_file => {
                self.clamp_cursor();
                self.rebuild_gutter();
            }
            Some(i) => self.select_file(i),
            None => {
                self.selected_file = None;
                self.gutter = GutterMap::new();
            }
        }
    }

    pub fn select_file(&mut self, index: usize) {
        if index >= self.deltas.len() {
            return;
        }
        self.selected_file = Some(index);
        self.drag = None;
        self.scroll_offset = 0;
        self.cursor_row = self
            .selected_delta()
            .and_then(|d| selectable_rows(d).first().copied())
            .unwrap_or(0);
        self.ensure_cursor_visible();
        self.rebuild_gutter();
    }

    /// Lay out one gutter row per diff row of the file in view.
    pub fn rebuild_gutter(&mut self) {
        let mut gutter = GutterMap::new();
        if let Some(delta) = self.selected_delta() {
            let selection = self.current_selection();
            for (i, row) in build_rows(delta).iter().enumerate() {
                let (old_lineno, new_lineno) = match row {
                    DiffRow::Line { line, .. } => (line.old_lineno, line.new_lineno),
                    DiffRow::HunkHeader { .. } => (None, None),
                };
                gutter.insert(
                    i,
                    GutterRow {
                        marker: Some(GutterMarker {
                            selected: selection.is_some_and(|s| s.is_selected(i)),
                        }),
                        old_lineno,
                        new_lineno,
                    },
                );
            }
        }
        self.gutter = gutter;
    }

    fn row_target(&self, row: usize) -> RowTarget {
        let Some(delta) = self.selected_delta() else {
            return RowTarget::Inert;
        };
        let rows = build_rows(delta);
        match rows.get(row) {
            Some(DiffRow::HunkHeader { .. }) => match hunk_bounds(&rows, row) {
                Some((start, end)) => RowTarget::Hunk { start, end },
                None => RowTarget::Inert,
            },
            Some(r) if r.is_selectable() => RowTarget::Change,
            _ => RowTarget::Inert,
        }
    }

    /// Start a gesture on `row`. A change row starts a drag that flips it;
    /// a hunk header toggles the whole hunk at once.
    pub fn begin_drag(&mut self, row: usize) {
        let Some(snapshot) = self.current_selection().cloned() else {
            return;
        };
        match self.row_target(row) {
            RowTarget::Hunk { start, end } => {
                let gesture = RangeSelection::toggle(start, end, snapshot);
                tracing::debug!(start, end, "toggling hunk");
                self.cursor_row = row;
                self.commit_gesture(&gesture);
            }
            RowTarget::Change => {
                let gesture = DragDropSelection::new(row, !snapshot.is_selected(row), snapshot);
                tracing::debug!(row, desired = gesture.desired_selection(), "drag started");
                gesture.paint(&mut self.gutter);
                self.cursor_row = row;
                self.drag = Some(gesture);
            }
            RowTarget::Inert => {}
        }
    }

    pub fn drag_to(&mut self, row: usize) {
        let Some(gesture) = self.drag.as_mut() else {
            return;
        };
        gesture.update(row);
        gesture.paint(&mut self.gutter);
        self.cursor_row = row;
    }

    pub fn end_drag(&mut self) {
        if let Some(gesture) = self.drag.take() {
            self.commit_gesture(&gesture);
        }
    }

    /// Apply a finished gesture to the file in view.
    pub fn commit_gesture(&mut self, gesture: &dyn SelectionStrategy) {
        let Some(path) = self.selected_delta().map(|d| d.path.clone()) else {
            return;
        };
        let mut next = None;
        gesture.apply(Some(&mut |selection: DiffSelection| next = Some(selection)));
        if let Some(selection) = next {
            self.gutter.sync(&selection);
            self.selections.insert(path, selection);
        }
    }

    pub fn toggle_cursor_row(&mut self) {
        let row = self.cursor_row;
        match self.row_target(row) {
            RowTarget::Hunk { .. } => self.begin_drag(row),
            RowTarget::Change => {
                let Some(snapshot) = self.current_selection().cloned() else {
                    return;
                };
                let gesture = DragDropSelection::new(row, !snapshot.is_selected(row), snapshot);
                self.commit_gesture(&gesture);
            }
            RowTarget::Inert => {}
        }
    }

    pub fn select_all(&mut self) {
        self.replace_selection(DiffSelection::with_select_all);
    }

    pub fn select_none(&mut self) {
        self.replace_selection(DiffSelection::with_select_none);
    }

    fn replace_selection(&mut self, f: impl FnOnce(&DiffSelection) -> DiffSelection) {
        let Some(path) = self.selected_delta().map(|d| d.path.clone()) else {
            return;
        };
        if let Some(current) = self.selections.get(&path) {
            let next = f(current);
            self.gutter.sync(&next);
            self.selections.insert(path, next);
        }
    }

    /// Files with at least one selected change, and the number of selected
    /// change lines across them.
    pub fn selection_summary(&self) -> (usize, usize) {
        let mut files = 0;
        let mut lines = 0;
        for delta in &self.deltas {
            let Some(selection) = self.selections.get(&delta.path) else {
                continue;
            };
            if selection.selection_type() == DiffSelectionType::None {
                continue;
            }
            files += 1;
            lines += selection.selected_rows().count();
        }
        (files, lines)
    }

    pub fn cursor_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(1);
        self.ensure_cursor_visible();
    }

    pub fn cursor_down(&mut self) {
        let max = self.row_count().saturating_sub(1);
        self.cursor_row = (self.cursor_row + 1).min(max);
        self.ensure_cursor_visible();
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        let max = self.row_count().saturating_sub(self.viewport_height);
        self.scroll_offset = (self.scroll_offset + n).min(max);
    }

    fn clamp_cursor(&mut self) {
        self.cursor_row = self.cursor_row.min(self.row_count().saturating_sub(1));
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        if self.cursor_row < self.scroll_offset {
            self.scroll_offset = self.cursor_row;
        } else if self.viewport_height > 0
            && self.cursor_row >= self.scroll_offset + self.viewport_height
        {
            self.scroll_offset = self.cursor_row + 1 - self.viewport_height;
        }
    }
}
