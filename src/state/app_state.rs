use crate::theme::Theme;

use super::{DiffOptions, DiffState, NavigatorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    Navigator,
    DiffView,
}

pub struct AppState {
    pub focus: FocusPanel,
    pub diff: DiffState,
    pub navigator: NavigatorState,
    pub theme: Theme,
    pub should_quit: bool,
    pub commit_dialog_open: bool,
    pub commit_message: String,
    pub status_message: Option<(String, bool)>, // (message, is_error)
    pub branch_label: String,
}

impl AppState {
    pub fn new(diff_options: DiffOptions, theme: Theme) -> Self {
        Self {
            focus: FocusPanel::Navigator,
            diff: DiffState::new(diff_options),
            navigator: NavigatorState::new(),
            theme,
            should_quit: false,
            commit_dialog_open: false,
            commit_message: String::new(),
            status_message: None,
            branch_label: String::new(),
        }
    }
}
