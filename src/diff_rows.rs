use std::collections::BTreeSet;

use crate::git::types::{DiffLine, FileDelta, Hunk};

/// One row of a file's diff as laid out in the diff view.
///
/// Rows are numbered across the whole file: each hunk contributes its header
/// row followed by one row per line. Row 0 is therefore always the first
/// hunk header.
#[derive(Debug, Clone, Copy)]
pub enum DiffRow<'a> {
    HunkHeader {
        hunk_index: usize,
        hunk: &'a Hunk,
    },
    Line {
        hunk_index: usize,
        line: &'a DiffLine,
    },
}

impl DiffRow<'_> {
    pub fn hunk_index(&self) -> usize {
        match self {
            DiffRow::HunkHeader { hunk_index, .. } | DiffRow::Line { hunk_index, .. } => {
                *hunk_index
            }
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, DiffRow::Line { line, .. } if line.is_change())
    }
}

pub fn build_rows(delta: &FileDelta) -> Vec<DiffRow<'_>> {
    let mut rows = Vec::new();
    for (hunk_index, hunk) in delta.hunks.iter().enumerate() {
        rows.push(DiffRow::HunkHeader { hunk_index, hunk });
        rows.extend(
            hunk.lines
                .iter()
                .map(|line| DiffRow::Line { hunk_index, line }),
        );
    }
    rows
}

/// Rows holding an addition or a deletion.
pub fn selectable_rows(delta: &FileDelta) -> BTreeSet<usize> {
    build_rows(delta)
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_selectable())
        .map(|(i, _)| i)
        .collect()
}

/// Inclusive span of selectable rows in the hunk containing `row`, or `None`
/// if that hunk has no changes.
pub fn hunk_bounds(rows: &[DiffRow<'_>], row: usize) -> Option<(usize, usize)> {
    let hunk_index = rows.get(row)?.hunk_index();
    let mut changes = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.hunk_index() == hunk_index && r.is_selectable())
        .map(|(i, _)| i);
    let first = changes.next()?;
    let last = changes.last().unwrap_or(first);
    Some((first, last))
}
