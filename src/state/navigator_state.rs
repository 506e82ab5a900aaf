use crate::git::types::FileDelta;

#[derive(Debug)]
pub struct NavigatorEntry {
    pub display: String,
    pub delta_index: usize,
}

#[derive(Debug, Default)]
pub struct NavigatorState {
    pub selected: usize,
    pub entries: Vec<NavigatorEntry>,
}

impl NavigatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_from_deltas(&mut self, deltas: &[FileDelta]) {
        self.entries = deltas
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let display = if d.binary {
                    format!("{} [{}] bin", d.path.display(), d.status.label())
                } else {
                    format!(
                        "{} [{}] +{} -{}",
                        d.path.display(),
                        d.status.label(),
                        d.additions,
                        d.deletions
                    )
                };
                NavigatorEntry {
                    display,
                    delta_index: i,
                }
            })
            .collect();

        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1).min(self.entries.len() - 1);
        }
    }

    /// Point the cursor at the entry for `delta_index`, if listed.
    pub fn select_delta(&mut self, delta_index: usize) {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.delta_index == delta_index)
        {
            self.selected = pos;
        }
    }

    pub fn selected_delta_index(&self) -> Option<usize> {
        self.entries.get(self.selected).map(|e| e.delta_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::types::FileStatus;
    use std::path::PathBuf;

    fn delta(path: &str) -> FileDelta {
        FileDelta {
            path: PathBuf::from(path),
            old_path: None,
            status: FileStatus::Modified,
            mode: 0o100644,
            hunks: Vec::new(),
            additions: 2,
            deletions: 1,
            binary: false,
        }
    }

    #[test]
    fn test_selection_clamped_after_update() {
        let mut nav = NavigatorState::new();
        nav.update_from_deltas(&[delta("a"), delta("b"), delta("c")]);
        nav.select_down();
        nav.select_down();
        nav.select_down();
        assert_eq!(nav.selected_delta_index(), Some(2));

        nav.update_from_deltas(&[delta("a")]);
        assert_eq!(nav.selected_delta_index(), Some(0));
        assert_eq!(nav.entries[0].display, "a [M] +2 -1");
    }

    #[test]
    fn test_empty() {
        let mut nav = NavigatorState::new();
        nav.update_from_deltas(&[]);
        nav.select_down();
        assert_eq!(nav.selected_delta_index(), None);
    }
}
