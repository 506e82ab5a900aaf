use std::borrow::Cow;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Deleted,
    Modified,
    Renamed,
    Untracked,
}

impl FileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Added => "A",
            FileStatus::Deleted => "D",
            FileStatus::Modified => "M",
            FileStatus::Renamed => "R",
            FileStatus::Untracked => "?",
        }
    }

    /// Whether the file does not exist on the old side of the diff.
    pub fn is_new(&self) -> bool {
        matches!(self, FileStatus::Added | FileStatus::Untracked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineOrigin {
    Context,
    Addition,
    Deletion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub origin: DiffLineOrigin,
    pub old_lineno: Option<u32>,
    pub new_lineno: Option<u32>,
    /// Raw line bytes, exactly as in the blob. Ends in `\n` unless it is the
    /// last line of a file without a trailing newline.
    pub content: Vec<u8>,
}

impl DiffLine {
    /// Line text for display, without the line terminator.
    pub fn text(&self) -> Cow<'_, str> {
        let end = self
            .content
            .iter()
            .rposition(|&b| b != b'\n' && b != b'\r')
            .map_or(0, |i| i + 1);
        String::from_utf8_lossy(&self.content[..end])
    }

    pub fn has_newline(&self) -> bool {
        self.content.ends_with(b"\n")
    }

    pub fn is_change(&self) -> bool {
        self.origin != DiffLineOrigin::Context
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub header: String,
    pub old_start: u32,
    pub lines: Vec<DiffLine>,
}

#[derive(Debug, Clone)]
pub struct FileDelta {
    pub path: PathBuf,
    pub old_path: Option<PathBuf>,
    pub status: FileStatus,
    /// Git file mode of the surviving side (e.g. `0o100644`).
    pub mode: u32,
    pub hunks: Vec<Hunk>,
    pub additions: usize,
    pub deletions: usize,
    pub binary: bool,
}
