use crate::gutter::GutterMap;
use crate::models::DiffSelection;

use super::{paint_range, SelectionStrategy};

/// Selects or clears a fixed span of rows in one go, used when the user
/// clicks a hunk header.
#[derive(Debug, Clone)]
pub struct RangeSelection {
    start: usize,
    end: usize,
    desired_selection: bool,
    snapshot: DiffSelection,
}

impl RangeSelection {
    /// `start..=end` is inclusive; the bounds may be given in either order.
    pub fn new(start: usize, end: usize, desired_selection: bool, snapshot: DiffSelection) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
            desired_selection,
            snapshot,
        }
    }

    /// Toggle a hunk: select it unless every selectable row in it already is.
    pub fn toggle(start: usize, end: usize, snapshot: DiffSelection) -> Self {
        let all_selected = (start..=end)
            .filter(|&row| snapshot.is_selectable(row))
            .all(|row| snapshot.is_selected(row));
        Self::new(start, end, !all_selected, snapshot)
    }

    pub fn desired_selection(&self) -> bool {
        self.desired_selection
    }
}

impl SelectionStrategy for RangeSelection {
    fn update(&mut self, _current: usize) {}

    fn apply(&self, on_include_changed: Option<&mut dyn FnMut(DiffSelection)>) {
        if let Some(on_include_changed) = on_include_changed {
            let length = self.end - self.start + 1;
            on_include_changed(self.snapshot.with_range_selection(
                self.start,
                length,
                self.desired_selection,
            ));
        }
    }

    fn paint(&self, gutter: &mut GutterMap) {
        paint_range(gutter, self.start, self.end, |row| self.is_selected(row));
    }

    fn is_selected(&self, index: usize) -> bool {
        if (self.start..=self.end).contains(&index) {
            self.desired_selection
        } else {
            self.snapshot.is_selected(index)
        }
    }
}
