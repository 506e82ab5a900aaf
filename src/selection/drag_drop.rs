use crate::gutter::GutterMap;
use crate::models::DiffSelection;

use super::{paint_range, SelectionStrategy};

/// Click-and-drag over the gutter, setting every row the pointer sweeps to
/// one desired value.
///
/// Rows inside the range between the starting row and the row under the
/// pointer take `desired_selection`; rows outside it fall back to `snapshot`,
/// so dragging back toward the start restores what was there before.
#[derive(Debug, Clone)]
pub struct DragDropSelection {
    start: usize,
    current: usize,
    desired_selection: bool,
    snapshot: DiffSelection,
}

impl DragDropSelection {
    pub fn new(start: usize, desired_selection: bool, snapshot: DiffSelection) -> Self {
        Self {
            start,
            current: start,
            desired_selection,
            snapshot,
        }
    }

    /// Lower bound of the range, inclusive.
    pub fn lower_index(&self) -> usize {
        self.start.min(self.current)
    }

    /// Upper bound of the range, inclusive.
    pub fn upper_index(&self) -> usize {
        self.start.max(self.current)
    }

    /// Row the gesture started on.
    pub fn initial_index(&self) -> usize {
        self.start
    }

    pub fn desired_selection(&self) -> bool {
        self.desired_selection
    }
}

impl SelectionStrategy for DragDropSelection {
    fn update(&mut self, current: usize) {
        self.current = current;
    }

    fn apply(&self, on_include_changed: Option<&mut dyn FnMut(DiffSelection)>) {
        let Some(on_include_changed) = on_include_changed else {
            return;
        };
        let length = self.upper_index() - self.lower_index() + 1;
        let selection =
            self.snapshot
                .with_range_selection(self.lower_index(), length, self.desired_selection);
        tracing::debug!(
            lower = self.lower_index(),
            length,
            desired = self.desired_selection,
            "applying drag selection"
        );
        on_include_changed(selection);
    }

    fn paint(&self, gutter: &mut GutterMap) {
        // The pointer can move back and forth, so the rows just outside the
        // range may still show the previous position.
        paint_range(gutter, self.lower_index(), self.upper_index(), |row| {
            self.is_selected(row)
        });
    }

    fn is_selected(&self, index: usize) -> bool {
        if index >= self.lower_index() && index <= self.upper_index() {
            return self.desired_selection;
        }
        self.snapshot.is_selected(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gutter::{GutterMarker, GutterRow};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn gutter(n: usize) -> GutterMap {
        let mut map = GutterMap::new();
        for i in 0..n {
            map.insert(
                i,
                GutterRow {
                    marker: Some(GutterMarker::default()),
                    ..Default::default()
                },
            );
        }
        map
    }

    #[test]
    fn test_bounds_follow_pointer() {
        for (start, current) in [(0, 0), (5, 10), (10, 5), (3, 3), (7, 0)] {
            let mut gesture = DragDropSelection::new(start, true, DiffSelection::none());
            gesture.update(current);
            assert!(gesture.lower_index() <= gesture.upper_index());
            assert_eq!(gesture.lower_index(), start.min(current));
            assert_eq!(gesture.upper_index(), start.max(current));
            assert_eq!(gesture.initial_index(), start);
        }
    }

    #[test]
    fn test_new_gesture_covers_only_start() {
        let gesture = DragDropSelection::new(4, true, DiffSelection::none());
        assert_eq!(gesture.lower_index(), 4);
        assert_eq!(gesture.upper_index(), 4);
        assert!(gesture.is_selected(4));
        assert!(!gesture.is_selected(5));
    }

    #[test]
    fn test_range_overrides_snapshot() {
        let mut gesture = DragDropSelection::new(5, true, DiffSelection::none());
        gesture.update(10);
        for i in 5..=10 {
            assert!(gesture.is_selected(i), "row {i}");
        }
        assert!(!gesture.is_selected(4));
        assert!(!gesture.is_selected(11));
    }

    #[test]
    fn test_outside_range_uses_snapshot() {
        let snapshot = DiffSelection::none()
            .with_selectable_rows((0..20).collect())
            .with_row_selection(2, true)
            .with_row_selection(15, true);
        let mut gesture = DragDropSelection::new(8, false, snapshot.clone());
        gesture.update(12);
        for i in 0..20 {
            let expected = if (8..=12).contains(&i) {
                false
            } else {
                snapshot.is_selected(i)
            };
            assert_eq!(gesture.is_selected(i), expected, "row {i}");
        }
    }

    #[test]
    fn test_update_reverses_past_start() {
        let mut gesture = DragDropSelection::new(5, true, DiffSelection::none());
        gesture.update(8);
        gesture.update(3);
        assert_eq!(gesture.lower_index(), 3);
        assert_eq!(gesture.upper_index(), 5);
        assert!(!gesture.is_selected(6));
    }

    #[test]
    fn test_apply_builds_range_selection() {
        let snapshot = DiffSelection::none().with_selectable_rows((0..10).collect());
        let mut gesture = DragDropSelection::new(2, true, snapshot.clone());
        gesture.update(4);

        let mut received = None;
        gesture.apply(Some(&mut |sel: DiffSelection| received = Some(sel)));

        let expected = snapshot.with_range_selection(2, 3, true);
        assert_eq!(received, Some(expected.clone()));
        assert_eq!(
            expected.selected_rows().collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
    }

    #[test]
    fn test_apply_after_reverse_drag() {
        let snapshot = DiffSelection::all().with_selectable_rows((0..10).collect());
        let mut gesture = DragDropSelection::new(6, false, snapshot);
        gesture.update(4);

        let mut received = None;
        gesture.apply(Some(&mut |sel: DiffSelection| received = Some(sel)));

        let selection = received.unwrap();
        let deselected: BTreeSet<usize> =
            (0..10).filter(|&i| !selection.is_selected(i)).collect();
        assert_eq!(deselected, BTreeSet::from([4, 5, 6]));
    }

    #[test]
    fn test_apply_without_consumer_is_noop() {
        let gesture = DragDropSelection::new(2, true, DiffSelection::none());
        gesture.apply(None);
    }

    #[test]
    fn test_paint_touches_one_row_margin() {
        let mut map = gutter(5);
        let gesture = DragDropSelection::new(2, true, DiffSelection::all());
        // Everything outside the range would paint selected from the snapshot.
        gesture.paint(&mut map);
        assert!(!map.is_marked(0));
        assert!(map.is_marked(1));
        assert!(map.is_marked(2));
        assert!(map.is_marked(3));
        assert!(!map.is_marked(4));
    }

    #[test]
    fn test_paint_clears_rows_left_behind() {
        let mut map = gutter(10);
        let mut gesture = DragDropSelection::new(3, true, DiffSelection::none());
        gesture.update(6);
        gesture.paint(&mut map);
        assert!(map.is_marked(6));

        gesture.update(5);
        gesture.paint(&mut map);
        assert!(map.is_marked(5));
        assert!(!map.is_marked(6));
    }

    #[test]
    fn test_paint_clamps_to_gutter_bounds() {
        let mut map = gutter(4);
        let mut gesture = DragDropSelection::new(0, true, DiffSelection::none());
        gesture.update(9);
        gesture.paint(&mut map);
        assert!(!map.is_marked(0));
        assert!(map.is_marked(1));
        assert!(map.is_marked(3));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_paint_skips_missing_rows() {
        // row 3 was never laid out, row 4 has no marker cell
        let mut map = GutterMap::new();
        for i in [0, 1, 2, 4, 5] {
            map.insert(
                i,
                GutterRow {
                    marker: (i != 4).then(GutterMarker::default),
                    ..Default::default()
                },
            );
        }
        let mut gesture = DragDropSelection::new(2, true, DiffSelection::none());
        gesture.update(4);
        gesture.paint(&mut map);
        assert!(map.is_marked(2));
        assert!(map.row(3).is_none());
        assert_eq!(map.row(4).unwrap().marker, None);
    }

    #[test]
    fn test_paint_empty_gutter() {
        let mut map = GutterMap::new();
        let gesture = DragDropSelection::new(0, true, DiffSelection::none());
        gesture.paint(&mut map);
        assert!(map.is_empty());
    }
}
