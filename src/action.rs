/// Central action enum; all state mutations flow through here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Lifecycle
    Quit,
    Tick,
    Resize,

    // Navigation
    NavigatorUp,
    NavigatorDown,
    SelectFile(usize),

    // Focus
    FocusNavigator,
    FocusDiffView,
    ToggleFocus,

    // Diff view
    CursorUp,
    CursorDown,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    RefreshDiff,

    // Line selection
    ToggleRow,
    SelectAllRows,
    SelectNoRows,
    /// Left button pressed on the gutter at a diff row.
    GutterPress(usize),
    /// Pointer dragged to a diff row while the button is held.
    GutterDrag(usize),
    GutterRelease,

    // Commit
    OpenCommitDialog,
    ConfirmCommit,
    CancelCommit,
    CommitChar(char),
    CommitBackspace,
}
