use std::collections::BTreeSet;

/// Aggregate selection state of a file's diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSelectionType {
    All,
    Partial,
    None,
}

/// Immutable record of which diff rows of one file are included in the next
/// commit.
///
/// Stored as a default (everything selected or nothing selected) plus the set
/// of rows that diverge from it, so "select all" and "select none" stay cheap
/// no matter how large the diff is. Every `with_*` method returns a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSelection {
    default_selected: bool,
    diverging_rows: BTreeSet<usize>,
    /// `None` means every row is selectable.
    selectable_rows: Option<BTreeSet<usize>>,
}

impl DiffSelection {
    pub fn all() -> Self {
        Self::from_default(true)
    }

    pub fn none() -> Self {
        Self::from_default(false)
    }

    fn from_default(default_selected: bool) -> Self {
        Self {
            default_selected,
            diverging_rows: BTreeSet::new(),
            selectable_rows: None,
        }
    }

    /// Restrict selection to `rows`. Divergences outside the new set are dropped.
    pub fn with_selectable_rows(&self, rows: BTreeSet<usize>) -> Self {
        let diverging_rows = self
            .diverging_rows
            .intersection(&rows)
            .copied()
            .collect();
        Self {
            default_selected: self.default_selected,
            diverging_rows,
            selectable_rows: Some(rows),
        }
    }

    pub fn selectable_rows(&self) -> Option<&BTreeSet<usize>> {
        self.selectable_rows.as_ref()
    }

    pub fn is_selectable(&self, row: usize) -> bool {
        self.selectable_rows
            .as_ref()
            .map_or(true, |rows| rows.contains(&row))
    }

    pub fn is_selected(&self, row: usize) -> bool {
        if !self.is_selectable(row) {
            return false;
        }
        self.default_selected != self.diverging_rows.contains(&row)
    }

    pub fn selection_type(&self) -> DiffSelectionType {
        let default_type = if self.default_selected {
            DiffSelectionType::All
        } else {
            DiffSelectionType::None
        };

        if self.diverging_rows.is_empty() {
            return default_type;
        }

        // Every selectable row diverging means the file has flipped entirely.
        if let Some(selectable) = &self.selectable_rows {
            if selectable.len() == self.diverging_rows.len()
                && selectable.iter().all(|r| self.diverging_rows.contains(r))
            {
                return if self.default_selected {
                    DiffSelectionType::None
                } else {
                    DiffSelectionType::All
                };
            }
        }

        DiffSelectionType::Partial
    }

    pub fn with_row_selection(&self, row: usize, selected: bool) -> Self {
        self.with_range_selection(row, 1, selected)
    }

    pub fn with_toggle_row_selection(&self, row: usize) -> Self {
        self.with_row_selection(row, !self.is_selected(row))
    }

    /// Set every selectable row in `[from, from + length)` to `selected`.
    pub fn with_range_selection(&self, from: usize, length: usize, selected: bool) -> Self {
        let to = from.saturating_add(length);
        let current = self.selection_type();

        match (current, selected) {
            (DiffSelectionType::All, true) | (DiffSelectionType::None, false) => {
                return self.clone();
            }
            _ => {}
        }

        if current == DiffSelectionType::Partial {
            let mut diverging_rows = self.diverging_rows.clone();
            if self.default_selected == selected {
                for row in from..to {
                    diverging_rows.remove(&row);
                }
            } else {
                diverging_rows.extend((from..to).filter(|&row| self.is_selectable(row)));
            }
            return Self {
                default_selected: self.default_selected,
                diverging_rows,
                selectable_rows: self.selectable_rows.clone(),
            };
        }

        // Uniform selection: rebase the default on it so the new rows diverge.
        Self {
            default_selected: current == DiffSelectionType::All,
            diverging_rows: (from..to).filter(|&row| self.is_selectable(row)).collect(),
            selectable_rows: self.selectable_rows.clone(),
        }
    }

    pub fn with_select_all(&self) -> Self {
        Self {
            default_selected: true,
            diverging_rows: BTreeSet::new(),
            selectable_rows: self.selectable_rows.clone(),
        }
    }

    pub fn with_select_none(&self) -> Self {
        Self {
            default_selected: false,
            diverging_rows: BTreeSet::new(),
            selectable_rows: self.selectable_rows.clone(),
        }
    }

    /// Selected rows, in order. Empty when the selectable set is unknown.
    pub fn selected_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.selectable_rows
            .iter()
            .flatten()
            .copied()
            .filter(|&row| self.is_selected(row))
    }
}
