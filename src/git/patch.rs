use std::fmt::Write as _;
use std::io::Write;

use crate::models::{DiffSelection, DiffSelectionType};

use super::types::{DiffLineOrigin, FileDelta, FileStatus};

/// Render a unified diff of `delta` that contains only the selected changes,
/// ready to be applied on top of the HEAD version of the file.
///
/// Unselected additions are dropped and unselected deletions are kept as
/// context. Hunks without a selected change are left out and the start line
/// of every following hunk is shifted accordingly. Returns `None` when no
/// change is selected. Line bytes are copied verbatim, whatever the encoding.
pub fn format_patch(delta: &FileDelta, selection: &DiffSelection) -> Option<Vec<u8>> {
    let mut body = Vec::new();
    let mut row = 0usize;
    let mut offset: i64 = 0;

    for hunk in &delta.hunks {
        // header row
        row += 1;

        let mut lines: Vec<(u8, &[u8])> = Vec::new();
        let (mut old_count, mut new_count) = (0u32, 0u32);
        let mut has_change = false;

        for line in &hunk.lines {
            let selected = selection.is_selected(row);
            row += 1;

            let prefix = match (line.origin, selected) {
                (DiffLineOrigin::Context, _) | (DiffLineOrigin::Deletion, false) => {
                    old_count += 1;
                    new_count += 1;
                    b' '
                }
                (DiffLineOrigin::Deletion, true) => {
                    old_count += 1;
                    has_change = true;
                    b'-'
                }
                (DiffLineOrigin::Addition, true) => {
                    new_count += 1;
                    has_change = true;
                    b'+'
                }
                (DiffLineOrigin::Addition, false) => continue,
            };
            lines.push((prefix, line.content.as_slice()));
        }

        if !has_change {
            continue;
        }

        // A zero-length side names the line *before* the hunk.
        let old_first = if old_count == 0 {
            hunk.old_start + 1
        } else {
            hunk.old_start
        };
        let new_first = i64::from(old_first) + offset;
        let new_start = if new_count == 0 { new_first - 1 } else { new_first };
        offset += i64::from(new_count) - i64::from(old_count);

        let _ = writeln!(
            body,
            "@@ -{},{} +{},{} @@",
            hunk.old_start, old_count, new_start, new_count
        );

        let last = lines.len() - 1;
        for (i, &(prefix, content)) in lines.iter().enumerate() {
            if prefix == b' ' && i < last && !content.ends_with(b"\n") {
                // The old last line lacks a newline but lines follow it in
                // the new file: replace it with a terminated copy. Both
                // counts stay the same.
                push_line(&mut body, b'-', content);
                body.push(b'+');
                body.extend_from_slice(content);
                body.push(b'\n');
            } else {
                push_line(&mut body, prefix, content);
            }
        }
    }

    if body.is_empty() {
        return None;
    }

    let mut patch = file_header(delta, selection).into_bytes();
    patch.extend_from_slice(&body);
    Some(patch)
}

fn push_line(out: &mut Vec<u8>, prefix: u8, content: &[u8]) {
    out.push(prefix);
    out.extend_from_slice(content);
    if !content.ends_with(b"\n") {
        out.extend_from_slice(b"\n\\ No newline at end of file\n");
    }
}

fn file_header(delta: &FileDelta, selection: &DiffSelection) -> String {
    let new_path = delta.path.to_string_lossy();
    let old_path = delta
        .old_path
        .as_deref()
        .unwrap_or(&delta.path)
        .to_string_lossy();

    let mut header = format!("diff --git a/{old_path} b/{new_path}\n");
    let deletes_file = delta.status == FileStatus::Deleted
        && selection.selection_type() == DiffSelectionType::All;

    if delta.status.is_new() {
        let _ = writeln!(header, "new file mode {:o}", delta.mode);
        header.push_str("--- /dev/null\n");
        let _ = writeln!(header, "+++ b/{new_path}");
    } else if deletes_file {
        let _ = writeln!(header, "deleted file mode {:o}", delta.mode);
        let _ = writeln!(header, "--- a/{old_path}");
        header.push_str("+++ /dev/null\n");
    } else {
        if old_path != new_path {
            let _ = writeln!(header, "rename from {old_path}");
            let _ = writeln!(header, "rename to {new_path}");
        }
        let _ = writeln!(header, "--- a/{old_path}");
        let _ = writeln!(header, "+++ b/{new_path}");
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff_rows::selectable_rows;
    use crate::diff_rows::tests::{delta, hunk, line};
    use pretty_assertions::assert_eq;
    use DiffLineOrigin::*;

    fn two_hunks() -> FileDelta {
        delta(
            FileStatus::Modified,
            vec![
                // rows 0..=4
                hunk(
                    1,
                    1,
                    vec![
                        line(Context, "a\n"),
                        line(Deletion, "b\n"),
                        line(Addition, "B\n"),
                        line(Addition, "C\n"),
                    ],
                ),
                // rows 5..=7
                hunk(10, 11, vec![line(Context, "x\n"), line(Addition, "y\n")]),
            ],
        )
    }

    fn render(d: &FileDelta, sel: &DiffSelection) -> String {
        String::from_utf8(format_patch(d, sel).unwrap()).unwrap()
    }

    fn selection_for(d: &FileDelta) -> DiffSelection {
        DiffSelection::all().with_selectable_rows(selectable_rows(d))
    }

    #[test]
    fn test_everything_selected() {
        let d = two_hunks();
        let patch = render(&d, &selection_for(&d));
        assert_eq!(
            patch,
            "diff --git a/src/lib.rs b/src/lib.rs\n\
             --- a/src/lib.rs\n\
             +++ b/src/lib.rs\n\
             @@ -1,2 +1,3 @@\n a\n-b\n+B\n+C\n\
             @@ -10,1 +11,2 @@\n x\n+y\n"
        );
    }

    #[test]
    fn test_nothing_selected() {
        let d = two_hunks();
        assert_eq!(format_patch(&d, &selection_for(&d).with_select_none()), None);
    }

    #[test]
    fn test_unselected_changes_become_context_or_vanish() {
        let d = two_hunks();
        // keep only the "C" addition in the first hunk
        let sel = selection_for(&d).with_select_none().with_row_selection(4, true);
        let patch = render(&d, &sel);
        assert_eq!(
            patch,
            "diff --git a/src/lib.rs b/src/lib.rs\n\
             --- a/src/lib.rs\n\
             +++ b/src/lib.rs\n\
             @@ -1,2 +1,3 @@\n a\n b\n+C\n"
        );
    }

    #[test]
    fn test_skipped_hunk_shifts_following_hunks() {
        let d = two_hunks();
        // drop "b" deletion and "B" addition, keep "C" and "y"
        let sel = selection_for(&d)
            .with_row_selection(2, false)
            .with_row_selection(3, false);
        let patch = render(&d, &sel);
        assert!(patch.contains("@@ -1,2 +1,3 @@\n a\n b\n+C\n"));
        assert!(patch.contains("@@ -10,1 +11,2 @@\n x\n+y\n"));

        // without the first hunk the second one lands at its old position
        let sel = selection_for(&d).with_select_none().with_row_selection(7, true);
        let patch = render(&d, &sel);
        assert!(patch.ends_with("@@ -10,1 +10,2 @@\n x\n+y\n"));
    }

    #[test]
    fn test_new_file_header() {
        let d = delta(
            FileStatus::Untracked,
            vec![hunk(0, 1, vec![line(Addition, "one\n"), line(Addition, "two")])],
        );
        let sel = selection_for(&d).with_row_selection(1, false);
        let patch = render(&d, &sel);
        assert_eq!(
            patch,
            "diff --git a/src/lib.rs b/src/lib.rs\n\
             new file mode 100644\n\
             --- /dev/null\n\
             +++ b/src/lib.rs\n\
             @@ -0,0 +1,1 @@\n+two\n\\ No newline at end of file\n"
        );
    }

    #[test]
    fn test_partial_delete_keeps_file() {
        let d = delta(
            FileStatus::Deleted,
            vec![hunk(1, 0, vec![line(Deletion, "one\n"), line(Deletion, "two\n")])],
        );
        let all = render(&d, &selection_for(&d));
        assert!(all.contains("deleted file mode 100644\n--- a/src/lib.rs\n+++ /dev/null\n"));
        assert!(all.contains("@@ -1,2 +0,0 @@\n-one\n-two\n"));

        let partial = render(&d, &selection_for(&d).with_row_selection(2, false));
        assert!(partial.contains("--- a/src/lib.rs\n+++ b/src/lib.rs\n"));
        assert!(partial.contains("@@ -1,2 +1,1 @@\n-one\n two\n"));
    }

    #[test]
    fn test_unterminated_context_gets_newline_before_selected_lines() {
        // HEAD "a\nb", work tree "a\nb\nc\n"
        let d = delta(
            FileStatus::Modified,
            vec![hunk(
                1,
                1,
                vec![
                    line(Context, "a\n"),
                    line(Deletion, "b"),
                    line(Addition, "b\n"),
                    line(Addition, "c\n"),
                ],
            )],
        );
        // only "+c"
        let sel = selection_for(&d).with_select_none().with_row_selection(4, true);
        assert_eq!(
            render(&d, &sel),
            "diff --git a/src/lib.rs b/src/lib.rs\n\
             --- a/src/lib.rs\n\
             +++ b/src/lib.rs\n\
             @@ -1,2 +1,3 @@\n a\n-b\n\\ No newline at end of file\n+b\n+c\n"
        );

        // with nothing after it the line keeps its missing newline
        let d = delta(
            FileStatus::Modified,
            vec![hunk(
                1,
                1,
                vec![line(Addition, "z\n"), line(Context, "a\n"), line(Deletion, "b")],
            )],
        );
        let sel = selection_for(&d).with_row_selection(3, false);
        assert!(render(&d, &sel)
            .ends_with("@@ -1,2 +1,3 @@\n+z\n a\n b\n\\ No newline at end of file\n"));
    }

    #[test]
    fn test_non_utf8_bytes_are_kept() {
        let mut d = delta(
            FileStatus::Modified,
            vec![hunk(
                1,
                1,
                vec![
                    line(Context, ""),
                    line(Addition, "x\n"),
                    line(Addition, "y\n"),
                ],
            )],
        );
        d.hunks[0].lines[0].content = b"caf\xe9\n".to_vec();
        let sel = selection_for(&d).with_row_selection(3, false);
        let patch = format_patch(&d, &sel).unwrap();
        assert!(patch.ends_with(b"@@ -1,1 +1,2 @@\n caf\xe9\n+x\n"));
    }
}
