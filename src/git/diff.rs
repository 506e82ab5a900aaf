use anyhow::{Context, Result};
use git2::{Delta, Diff, DiffOptions, Patch, Repository};
use std::path::{Path, PathBuf};

use super::types::*;
use crate::state::diff_state::DiffOptions as AppDiffOptions;

pub struct DiffEngine;

impl DiffEngine {
    /// Diff the HEAD tree against the working directory, untracked files
    /// included. The index is ignored: what gets committed is decided by
    /// the line selection, not by what happens to be staged.
    pub fn compute_diff(repo: &Repository, options: &AppDiffOptions) -> Result<Vec<FileDelta>> {
        let mut diff_opts = DiffOptions::new();
        diff_opts.ignore_whitespace(options.ignore_whitespace);
        diff_opts.include_untracked(true);
        diff_opts.recurse_untracked_dirs(true);
        diff_opts.show_untracked_content(true);
        diff_opts.context_lines(options.context_lines);
        for spec in &options.pathspecs {
            diff_opts.pathspec(spec.as_str());
        }

        // New repos may have no commits
        let head_tree = match repo.head() {
            Ok(head) => Some(head.peel_to_tree().context("HEAD does not point to a tree")?),
            Err(_) => None,
        };

        let diff = repo
            .diff_tree_to_workdir(head_tree.as_ref(), Some(&mut diff_opts))
            .context("Failed to diff HEAD against the working tree")?;

        Self::parse_diff(&diff)
    }

    fn parse_diff(diff: &Diff<'_>) -> Result<Vec<FileDelta>> {
        let mut deltas = Vec::with_capacity(diff.deltas().len());

        for i in 0..diff.deltas().len() {
            let Some(delta) = diff.get_delta(i) else {
                continue;
            };
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .unwrap_or_else(|| Path::new("<unknown>"))
                .to_path_buf();

            let old_path = if delta.status() == Delta::Renamed {
                delta.old_file().path().map(PathBuf::from)
            } else {
                None
            };

            let status = match delta.status() {
                Delta::Added => FileStatus::Added,
                Delta::Deleted => FileStatus::Deleted,
                Delta::Modified => FileStatus::Modified,
                Delta::Renamed => FileStatus::Renamed,
                Delta::Untracked => FileStatus::Untracked,
                _ => FileStatus::Modified,
            };

            let mode = if status == FileStatus::Deleted {
                u32::from(delta.old_file().mode())
            } else {
                u32::from(delta.new_file().mode())
            };

            let mut file = FileDelta {
                path,
                old_path,
                status,
                mode,
                hunks: Vec::new(),
                additions: 0,
                deletions: 0,
                binary: delta.flags().is_binary(),
            };

            let patch = Patch::from_diff(diff, i)
                .with_context(|| format!("Failed to load patch for {}", file.path.display()))?;
            if let Some(patch) = patch {
                // libgit2 only knows a file is binary once its content was loaded
                file.binary |= patch.delta().flags().is_binary();
                if !file.binary {
                    Self::parse_hunks(&patch, &mut file)?;
                }
            }

            deltas.push(file);
        }

        Ok(deltas)
    }

    fn parse_hunks(patch: &Patch<'_>, file: &mut FileDelta) -> Result<()> {
        for h in 0..patch.num_hunks() {
            let (hunk, line_count) = patch.hunk(h)?;
            let mut parsed = Hunk {
                header: String::from_utf8_lossy(hunk.header()).trim_end().to_string(),
                old_start: hunk.old_start(),
                lines: Vec::with_capacity(line_count),
            };

            for l in 0..line_count {
                let line = patch.line_in_hunk(h, l)?;
                let origin = match line.origin() {
                    '+' => {
                        file.additions += 1;
                        DiffLineOrigin::Addition
                    }
                    '-' => {
                        file.deletions += 1;
                        DiffLineOrigin::Deletion
                    }
                    ' ' => DiffLineOrigin::Context,
                    // '=', '>' and '<' mark a missing newline at EOF, which
                    // is already visible in the content itself.
                    _ => continue,
                };
                parsed.lines.push(DiffLine {
                    origin,
                    old_lineno: line.old_lineno(),
                    new_lineno: line.new_lineno(),
                    content: line.content().to_vec(),
                });
            }

            file.hunks.push(parsed);
        }
        Ok(())
    }
}
