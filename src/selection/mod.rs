pub mod drag_drop;
pub mod range;

pub use drag_drop::DragDropSelection;
pub use range::RangeSelection;

use crate::gutter::GutterMap;
use crate::models::DiffSelection;

/// A gesture that changes which rows of a diff are selected.
///
/// While the gesture is live, `is_selected` and `paint` report the in-flight
/// state; nothing is committed until `apply` hands a new `DiffSelection` to
/// the caller.
pub trait SelectionStrategy {
    /// Move the gesture to the row under the pointer.
    fn update(&mut self, current: usize);

    /// Deliver the resulting selection. Does nothing without a consumer.
    fn apply(&self, on_include_changed: Option<&mut dyn FnMut(DiffSelection)>);

    /// Reflect the in-flight selection onto the gutter.
    fn paint(&self, gutter: &mut GutterMap);

    fn is_selected(&self, index: usize) -> bool;
}

/// Paint rows `[lower - 1, upper + 1]` from `is_selected`, clamped to the
/// gutter. Row 0 is the file's first hunk header and is left alone.
pub(crate) fn paint_range(
    gutter: &mut GutterMap,
    lower: usize,
    upper: usize,
    is_selected: impl Fn(usize) -> bool,
) {
    let start = lower.saturating_sub(1).max(1);
    let Some(last) = gutter.len().checked_sub(1) else {
        return;
    };
    let end = upper.saturating_add(1).min(last);

    for row in start..=end {
        let Some(element) = gutter.row_mut(row) else {
            tracing::error!(row, "expected gutter row not found");
            continue;
        };
        let Some(marker) = element.marker.as_mut() else {
            tracing::error!(row, "expected selection marker for gutter row not found");
            continue;
        };
        marker.selected = is_selected(row);
    }
}
