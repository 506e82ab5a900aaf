use anyhow::{bail, Context, Result};
use git2::{Diff, Index, Repository};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::diff_rows::selectable_rows;
use crate::models::{DiffSelection, DiffSelectionType};

use super::patch::format_patch;
use super::types::{FileDelta, FileStatus};

/// What `stage_selection` put into the index.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub whole_files: usize,
    pub partial_files: usize,
}

impl StageSummary {
    pub fn total(&self) -> usize {
        self.whole_files + self.partial_files
    }
}

/// The selection in effect for `delta`: the stored one, or everything.
pub fn effective_selection(
    delta: &FileDelta,
    selections: &HashMap<PathBuf, DiffSelection>,
) -> DiffSelection {
    selections
        .get(&delta.path)
        .cloned()
        .unwrap_or_else(|| DiffSelection::all().with_selectable_rows(selectable_rows(delta)))
}

/// Rebuild the index from HEAD plus the selected lines of each file.
///
/// Anything staged beforehand is discarded. The index file is written once,
/// after every file staged cleanly; on error it is left as it was.
pub fn stage_selection(
    repo: &Repository,
    deltas: &[FileDelta],
    selections: &HashMap<PathBuf, DiffSelection>,
) -> Result<StageSummary> {
    let mut index = repo.index().context("Failed to open the index")?;

    let summary = match build_index(repo, &mut index, deltas, selections) {
        Ok(summary) => summary,
        Err(e) => {
            // drop the in-memory changes
            if let Err(reload) = index.read(true) {
                tracing::warn!(error = %reload, "failed to reload the index");
            }
            return Err(e);
        }
    };

    index.write().context("Failed to write the index")?;
    Ok(summary)
}

fn build_index(
    repo: &Repository,
    index: &mut Index,
    deltas: &[FileDelta],
    selections: &HashMap<PathBuf, DiffSelection>,
) -> Result<StageSummary> {
    match repo.head() {
        Ok(head) => {
            let tree = head.peel_to_tree().context("HEAD does not point to a tree")?;
            index.read_tree(&tree).context("Failed to reset the index to HEAD")?;
        }
        Err(_) => index.clear()?,
    }

    let mut summary = StageSummary::default();
    let mut patch = Vec::new();

    for delta in deltas {
        let selection = effective_selection(delta, selections);
        let kind = if delta.binary || delta.hunks.is_empty() {
            // no line-level selection possible, only the whole file
            match selection.selection_type() {
                DiffSelectionType::None => DiffSelectionType::None,
                _ => DiffSelectionType::All,
            }
        } else {
            selection.selection_type()
        };

        match kind {
            DiffSelectionType::None => {}
            DiffSelectionType::All => {
                if delta.status == FileStatus::Deleted {
                    index
                        .remove_path(&delta.path)
                        .with_context(|| format!("Failed to stage removal of {}", delta.path.display()))?;
                } else {
                    index
                        .add_path(&delta.path)
                        .with_context(|| format!("Failed to stage {}", delta.path.display()))?;
                }
                summary.whole_files += 1;
            }
            DiffSelectionType::Partial => {
                if let Some(file_patch) = format_patch(delta, &selection) {
                    patch.extend_from_slice(&file_patch);
                    summary.partial_files += 1;
                }
            }
        }
    }

    if summary.total() == 0 {
        bail!("Nothing selected to commit");
    }

    if !patch.is_empty() {
        tracing::debug!(bytes = patch.len(), "applying partial patch");
        let diff = Diff::from_buffer(&patch).context("Failed to parse generated patch")?;
        let base_id = index.write_tree().context("Failed to write the staged tree")?;
        let base = repo.find_tree(base_id)?;
        let mut applied = repo
            .apply_to_tree(&base, &diff, None)
            .context("Failed to apply selected lines to the index")?;
        let tree_id = applied
            .write_tree_to(repo)
            .context("Failed to write the patched tree")?;
        index.read_tree(&repo.find_tree(tree_id)?)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff_rows::{build_rows, DiffRow};
    use crate::git::types::DiffLineOrigin;
    use crate::git::DiffEngine;
    use crate::state::diff_state::DiffOptions;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn init_repo<C: AsRef<[u8]>>(files: &[(&str, C)]) -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content.as_ref()).unwrap();
        }
        {
            let mut index = repo.index().unwrap();
            for (name, _) in files {
                index.add_path(Path::new(name)).unwrap();
            }
            index.write().unwrap();
            let tree_id = index.write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            let sig = git2::Signature::now("test", "test@example.com").unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
                .unwrap();
        }
        (dir, repo)
    }

    fn staged_bytes(repo: &Repository, path: &str) -> Option<Vec<u8>> {
        let index = repo.index().unwrap();
        let entry = index.get_path(Path::new(path), 0)?;
        let blob = repo.find_blob(entry.id).unwrap();
        Some(blob.content().to_vec())
    }

    fn staged_content(repo: &Repository, path: &str) -> Option<String> {
        staged_bytes(repo, path).map(|b| String::from_utf8(b).unwrap())
    }

    /// Row of the first line in `delta` with this origin and content.
    fn row_of(delta: &FileDelta, origin: DiffLineOrigin, content: &[u8]) -> usize {
        build_rows(delta)
            .iter()
            .position(|r| {
                matches!(r, DiffRow::Line { line, .. }
                    if line.origin == origin && line.content == content)
            })
            .unwrap()
    }

    fn only_row(delta: &FileDelta, row: usize) -> HashMap<PathBuf, DiffSelection> {
        let selection = DiffSelection::none()
            .with_selectable_rows(selectable_rows(delta))
            .with_row_selection(row, true);
        HashMap::from([(delta.path.clone(), selection)])
    }

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}\n")).collect()
    }

    #[test]
    fn test_stage_first_hunk_only() {
        let original = numbered(20);
        let (dir, repo) = init_repo(&[("a.txt", &original)]);
        let changed = original
            .replace("line 2\n", "line two\n")
            .replace("line 19\n", "line nineteen\n");
        fs::write(dir.path().join("a.txt"), &changed).unwrap();

        let options = DiffOptions::new(false, 1, Vec::new());
        let deltas = DiffEngine::compute_diff(&repo, &options).unwrap();
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].hunks.len(), 2);

        // rows: 0 header, 1 ctx, 2 -, 3 +, 4 ctx, 5 header, ...
        let delta = &deltas[0];
        let selection = DiffSelection::all()
            .with_selectable_rows(selectable_rows(delta))
            .with_range_selection(5, 10, false);
        let selections = HashMap::from([(delta.path.clone(), selection)]);

        let summary = stage_selection(&repo, &deltas, &selections).unwrap();
        assert_eq!(summary, StageSummary { whole_files: 0, partial_files: 1 });
        assert_eq!(
            staged_content(&repo, "a.txt").unwrap(),
            original.replace("line 2\n", "line two\n")
        );
    }

    #[test]
    fn test_stage_whole_and_skip_unselected() {
        let (dir, repo) = init_repo(&[("a.txt", "a\n"), ("b.txt", "b\n")]);
        fs::write(dir.path().join("a.txt"), "a\nmore\n").unwrap();
        fs::write(dir.path().join("b.txt"), "b\nmore\n").unwrap();
        fs::write(dir.path().join("new.txt"), "fresh\n").unwrap();

        let options = DiffOptions::new(false, 3, Vec::new());
        let deltas = DiffEngine::compute_diff(&repo, &options).unwrap();
        let b = deltas
            .iter()
            .find(|d| d.path == Path::new("b.txt"))
            .unwrap();
        let selections = HashMap::from([(
            b.path.clone(),
            DiffSelection::none().with_selectable_rows(selectable_rows(b)),
        )]);

        let summary = stage_selection(&repo, &deltas, &selections).unwrap();
        assert_eq!(summary.whole_files, 2);
        assert_eq!(staged_content(&repo, "a.txt").unwrap(), "a\nmore\n");
        assert_eq!(staged_content(&repo, "b.txt").unwrap(), "b\n");
        assert_eq!(staged_content(&repo, "new.txt").unwrap(), "fresh\n");
    }

    #[test]
    fn test_stage_nothing_is_an_error() {
        let (dir, repo) = init_repo(&[("a.txt", "a\n")]);
        fs::write(dir.path().join("a.txt"), "b\n").unwrap();

        let options = DiffOptions::new(false, 3, Vec::new());
        let deltas = DiffEngine::compute_diff(&repo, &options).unwrap();
        let selections = HashMap::from([(PathBuf::from("a.txt"), DiffSelection::none())]);
        assert!(stage_selection(&repo, &deltas, &selections).is_err());
    }

    #[test]
    fn test_stage_line_after_unterminated_last_line() {
        let (dir, repo) = init_repo(&[("a.txt", "a\nb")]);
        fs::write(dir.path().join("a.txt"), "a\nb\nc\n").unwrap();

        let options = DiffOptions::new(false, 3, Vec::new());
        let deltas = DiffEngine::compute_diff(&repo, &options).unwrap();
        let row = row_of(&deltas[0], DiffLineOrigin::Addition, b"c\n");

        stage_selection(&repo, &deltas, &only_row(&deltas[0], row)).unwrap();
        assert_eq!(staged_content(&repo, "a.txt").unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn test_stage_non_utf8_lines() {
        let (dir, repo) = init_repo(&[("a.txt", b"caf\xe9\n".as_slice())]);
        fs::write(dir.path().join("a.txt"), b"caf\xe9\nx\xff\ny\n").unwrap();

        let options = DiffOptions::new(false, 3, Vec::new());
        let deltas = DiffEngine::compute_diff(&repo, &options).unwrap();
        let row = row_of(&deltas[0], DiffLineOrigin::Addition, b"x\xff\n");

        stage_selection(&repo, &deltas, &only_row(&deltas[0], row)).unwrap();
        assert_eq!(staged_bytes(&repo, "a.txt").unwrap(), b"caf\xe9\nx\xff\n");
    }

    #[test]
    fn test_failed_apply_leaves_index_alone() {
        let (dir, repo) = init_repo(&[("a.txt", "a\nb\n"), ("z.txt", "z\n")]);
        fs::write(dir.path().join("a.txt"), "A\nb\nC\n").unwrap();
        fs::write(dir.path().join("z.txt"), "z\nzz\n").unwrap();

        let options = DiffOptions::new(false, 3, Vec::new());
        let mut deltas = DiffEngine::compute_diff(&repo, &options).unwrap();
        let a = deltas
            .iter()
            .position(|d| d.path == Path::new("a.txt"))
            .unwrap();
        let row = row_of(&deltas[a], DiffLineOrigin::Addition, b"C\n");
        let selections = only_row(&deltas[a], row);

        // context that no longer matches HEAD makes the patch fail
        let context = deltas[a].hunks[0]
            .lines
            .iter_mut()
            .find(|l| l.origin == DiffLineOrigin::Context)
            .unwrap();
        context.content = b"bogus\n".to_vec();

        assert!(stage_selection(&repo, &deltas, &selections).is_err());

        let reopened = Repository::open(dir.path()).unwrap();
        assert_eq!(staged_content(&reopened, "z.txt").unwrap(), "z\n");
        assert_eq!(staged_content(&reopened, "a.txt").unwrap(), "a\nb\n");
        assert_eq!(staged_content(&repo, "z.txt").unwrap(), "z\n");
    }
}
