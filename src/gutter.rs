use std::collections::BTreeMap;

use crate::models::DiffSelection;

/// Selection indicator drawn in a gutter row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GutterMarker {
    pub selected: bool,
}

/// One rendered row of the diff gutter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GutterRow {
    /// `None` when the row was laid out without a marker cell.
    pub marker: Option<GutterMarker>,
    pub old_lineno: Option<u32>,
    pub new_lineno: Option<u32>,
}

/// Row index -> rendered gutter row for the file currently in the diff view.
///
/// Gestures paint into this directly while the pointer moves; the renderer
/// only reads it. After a gesture is applied the map is re-synced from the
/// committed `DiffSelection`.
#[derive(Debug, Clone, Default)]
pub struct GutterMap {
    rows: BTreeMap<usize, GutterRow>,
}

impl GutterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, row: GutterRow) {
        self.rows.insert(index, row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&GutterRow> {
        self.rows.get(&index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut GutterRow> {
        self.rows.get_mut(&index)
    }

    /// Whether row `index` currently shows as selected.
    pub fn is_marked(&self, index: usize) -> bool {
        self.rows
            .get(&index)
            .and_then(|r| r.marker)
            .is_some_and(|m| m.selected)
    }

    /// Repaint every marker from `selection`.
    pub fn sync(&mut self, selection: &DiffSelection) {
        for (&index, row) in self.rows.iter_mut() {
            if let Some(marker) = row.marker.as_mut() {
                marker.selected = selection.is_selected(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_sync_follows_selection() {
        let mut map = gutter(4);
        let selection = DiffSelection::none()
            .with_selectable_rows(BTreeSet::from([1, 2, 3]))
            .with_row_selection(2, true);
        map.sync(&selection);
        assert!(!map.is_marked(0));
        assert!(!map.is_marked(1));
        assert!(map.is_marked(2));
        assert!(!map.is_marked(3));
    }

    #[test]
    fn test_sync_skips_rows_without_marker() {
        let mut map = gutter(2);
        map.row_mut(1).unwrap().marker = None;
        map.sync(&DiffSelection::all());
        assert!(map.is_marked(0));
        assert!(!map.is_marked(1));
        assert_eq!(map.row(1).unwrap().marker, None);
    }
}
