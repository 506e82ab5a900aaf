use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::cell::Cell;
use std::path::PathBuf;
use std::time::Duration;

use crate::action::Action;
use crate::async_diff::{DiffRequest, DiffWorker};
use crate::components::action_hud::ActionHud;
use crate::components::commit_dialog::render_commit_dialog;
use crate::components::context_bar::ContextBar;
use crate::components::diff_view::{self, DiffView};
use crate::components::navigator::Navigator;
use crate::components::Component;
use crate::event::{map_key_to_action, Event, EventReader, KeyContext};
use crate::git::commands::GitCli;
use crate::git::stage::{stage_selection, StageSummary};
use crate::git::RepoCache;
use crate::state::app_state::FocusPanel;
use crate::state::{AppState, DiffOptions};
use crate::theme::Theme;
use crate::tui::Tui;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: usize = 3;

pub struct App {
    state: AppState,
    worker: DiffWorker,
    generation: u64,
    git_cli: GitCli,
    status_clear_countdown: u32,
    repo_path: PathBuf,
    nav_area: Cell<Rect>,
    diff_area: Cell<Rect>,
}

impl App {
    pub fn new(
        diff_options: DiffOptions,
        theme: Theme,
        repo_path: PathBuf,
        branch_label: String,
    ) -> Self {
        let mut state = AppState::new(diff_options, theme);
        state.branch_label = branch_label;

        let worker = DiffWorker::new(repo_path.clone());
        let git_cli = GitCli::new(&repo_path);
        Self {
            state,
            worker,
            generation: 0,
            git_cli,
            status_clear_countdown: 0,
            repo_path,
            nav_area: Cell::new(Rect::default()),
            diff_area: Cell::new(Rect::default()),
        }
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        self.request_diff();

        let mut events = EventReader::new(Duration::from_millis(50));

        let context_bar = ContextBar;
        let navigator = Navigator;
        let diff_view = DiffView;
        let action_hud = ActionHud;

        loop {
            self.poll_diff_results();

            // context bar + hud + diff borders
            let term_size = terminal.size()?;
            self.state.diff.viewport_height = term_size.height.saturating_sub(4) as usize;

            terminal.draw(|frame| {
                let outer = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Min(3),
                        Constraint::Length(1),
                    ])
                    .split(frame.area());

                context_bar.render(frame, outer[0], &self.state);

                let main = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
                    .split(outer[1]);

                self.nav_area.set(main[0]);
                self.diff_area.set(main[1]);
                navigator.render(frame, main[0], &self.state);
                diff_view.render(frame, main[1], &self.state);

                action_hud.render(frame, outer[2], &self.state);

                if self.state.commit_dialog_open {
                    render_commit_dialog(frame, &self.state);
                }
            })?;

            // Wait for at least one event, then drain all pending events
            // to avoid input lag from buffered scroll/key events.
            let first = events.next().await;
            let mut pending = Vec::new();
            if let Some(ev) = first {
                pending.push(ev);
            }
            while let Some(ev) = events.try_next() {
                pending.push(ev);
            }

            // Coalesce: collapse consecutive wheel scrolls into net movement
            let mut scroll_delta: i32 = 0;
            let mut actions: Vec<Action> = Vec::new();

            for event in pending {
                let ctx = KeyContext {
                    focus: self.state.focus,
                    commit_dialog_open: self.state.commit_dialog_open,
                };
                let action = match event {
                    Event::Key(key) => map_key_to_action(key, &ctx),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize => Some(Action::Resize),
                    Event::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    match action {
                        Action::ScrollUp => scroll_delta -= 1,
                        Action::ScrollDown => scroll_delta += 1,
                        other => {
                            // Keep gesture events ordered against the wheel.
                            if scroll_delta != 0 {
                                push_scroll(std::mem::take(&mut scroll_delta), &mut actions);
                            }
                            actions.push(other);
                        }
                    }
                }
            }
            push_scroll(scroll_delta, &mut actions);

            for action in actions {
                self.update(action);
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn request_diff(&mut self) {
        self.generation += 1;
        self.state.diff.loading = true;
        tracing::debug!(generation = self.generation, "requesting diff");
        self.worker.request(DiffRequest {
            generation: self.generation,
            options: self.state.diff.options.clone(),
        });
    }

    fn poll_diff_results(&mut self) {
        while let Some(result) = self.worker.try_recv() {
            if result.generation < self.generation {
                tracing::trace!(generation = result.generation, "dropping stale diff");
                continue;
            }
            self.state.diff.loading = false;
            match result.deltas {
                Ok(deltas) => {
                    tracing::info!(files = deltas.len(), "diff loaded");
                    self.state.navigator.update_from_deltas(&deltas);
                    self.state.diff.set_deltas(deltas);
                    if let Some(idx) = self.state.diff.selected_file {
                        self.state.navigator.select_delta(idx);
                    }
                }
                Err(e) => {
                    self.state.diff.set_deltas(Vec::new());
                    self.state.navigator.update_from_deltas(&[]);
                    self.set_status(format!("Diff failed: {e}"), true);
                }
            }
        }
    }

    fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.state.should_quit = true;
            }
            Action::Tick => {
                if self.status_clear_countdown > 0 {
                    self.status_clear_countdown -= 1;
                    if self.status_clear_countdown == 0 {
                        self.state.status_message = None;
                    }
                }
            }
            Action::Resize => {}

            Action::NavigatorUp => {
                self.state.navigator.select_up();
                self.sync_selection();
            }
            Action::NavigatorDown => {
                self.state.navigator.select_down();
                self.sync_selection();
            }
            Action::SelectFile(idx) => {
                self.state.navigator.select_delta(idx);
                self.state.diff.select_file(idx);
                self.state.focus = FocusPanel::Navigator;
            }

            Action::FocusNavigator => {
                self.state.focus = FocusPanel::Navigator;
            }
            Action::FocusDiffView => {
                if self.state.diff.selected_delta().is_some() {
                    self.state.focus = FocusPanel::DiffView;
                }
            }
            Action::ToggleFocus => {
                self.state.focus = match self.state.focus {
                    FocusPanel::Navigator if self.state.diff.selected_delta().is_some() => {
                        FocusPanel::DiffView
                    }
                    _ => FocusPanel::Navigator,
                };
            }

            Action::CursorUp => self.state.diff.cursor_up(),
            Action::CursorDown => self.state.diff.cursor_down(),
            Action::ScrollUp => self.state.diff.scroll_up(WHEEL_STEP),
            Action::ScrollDown => self.state.diff.scroll_down(WHEEL_STEP),
            Action::ScrollPageUp => {
                let page = self.state.diff.viewport_height.max(1);
                for _ in 0..page {
                    self.state.diff.cursor_up();
                }
            }
            Action::ScrollPageDown => {
                let page = self.state.diff.viewport_height.max(1);
                for _ in 0..page {
                    self.state.diff.cursor_down();
                }
            }
            Action::RefreshDiff => {
                self.request_diff();
            }

            Action::ToggleRow => self.state.diff.toggle_cursor_row(),
            Action::SelectAllRows => self.state.diff.select_all(),
            Action::SelectNoRows => self.state.diff.select_none(),
            Action::GutterPress(row) => {
                self.state.focus = FocusPanel::DiffView;
                self.state.diff.begin_drag(row);
            }
            Action::GutterDrag(row) => self.state.diff.drag_to(row),
            Action::GutterRelease => self.state.diff.end_drag(),

            Action::OpenCommitDialog => {
                if self.state.diff.loading {
                    self.set_status("Diff is still loading".to_string(), true);
                } else if self.state.diff.selection_summary().0 == 0 {
                    self.set_status("Nothing selected to commit".to_string(), true);
                } else {
                    self.state.commit_dialog_open = true;
                }
            }
            Action::CancelCommit => {
                self.state.commit_dialog_open = false;
            }
            Action::ConfirmCommit => {
                if self.state.commit_message.trim().is_empty() {
                    self.set_status("Commit message cannot be empty".to_string(), true);
                } else {
                    let msg = self.state.commit_message.clone();
                    match self.commit_selection(&msg) {
                        Ok(summary) => {
                            tracing::info!(
                                whole_files = summary.whole_files,
                                partial_files = summary.partial_files,
                                "committed selection"
                            );
                            self.set_status(
                                format!("Committed {} file(s)", summary.total()),
                                false,
                            );
                            self.state.commit_dialog_open = false;
                            self.state.commit_message.clear();
                            self.request_diff();
                        }
                        Err(e) => {
                            tracing::error!(error = %format!("{e:#}"), "commit failed");
                            self.set_status(format!("Commit failed: {e:#}"), true);
                        }
                    }
                }
            }
            Action::CommitChar(c) => {
                self.state.commit_message.push(c);
            }
            Action::CommitBackspace => {
                self.state.commit_message.pop();
            }
        }
    }

    /// Stage exactly the selected lines, then commit them.
    fn commit_selection(&self, message: &str) -> Result<StageSummary> {
        let repo = RepoCache::open(&self.repo_path)?;
        let summary = stage_selection(
            repo.repo(),
            &self.state.diff.deltas,
            &self.state.diff.selections,
        )?;
        self.git_cli.commit(message)?;
        Ok(summary)
    }

    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        if self.state.commit_dialog_open {
            return None;
        }
        let col = mouse.column;
        let row = mouse.row;

        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            MouseEventKind::Down(MouseButton::Left) => {
                let nav = self.nav_area.get();
                // Check if click is inside the navigator area (excluding border)
                if col > nav.x
                    && col < nav.x + nav.width.saturating_sub(1)
                    && row > nav.y
                    && row < nav.y + nav.height.saturating_sub(1)
                {
                    let inner_height = nav.height.saturating_sub(2) as usize;
                    let scroll = Navigator::scroll_for(self.state.navigator.selected, inner_height);
                    let clicked = scroll + (row - nav.y - 1) as usize;
                    return self
                        .state
                        .navigator
                        .entries
                        .get(clicked)
                        .map(|entry| Action::SelectFile(entry.delta_index));
                }

                diff_view::row_at(
                    self.diff_area.get(),
                    self.state.diff.scroll_offset,
                    self.state.diff.row_count(),
                    col,
                    row,
                    true,
                )
                .map(Action::GutterPress)
            }
            MouseEventKind::Drag(MouseButton::Left) if self.state.diff.drag.is_some() => {
                diff_view::row_at(
                    self.diff_area.get(),
                    self.state.diff.scroll_offset,
                    self.state.diff.row_count(),
                    col,
                    row,
                    false,
                )
                .map(Action::GutterDrag)
            }
            MouseEventKind::Up(MouseButton::Left) if self.state.diff.drag.is_some() => {
                Some(Action::GutterRelease)
            }
            _ => None,
        }
    }

    fn set_status(&mut self, msg: String, is_error: bool) {
        self.state.status_message = Some((msg, is_error));
        // ~3 seconds at 50ms tick rate
        self.status_clear_countdown = 60;
    }

    /// Show the file under the navigator cursor.
    fn sync_selection(&mut self) {
        if let Some(idx) = self.state.navigator.selected_delta_index() {
            if self.state.diff.selected_file != Some(idx) {
                self.state.diff.select_file(idx);
            }
        }
    }
}

/// Expand a net wheel movement back into single-step scroll actions.
fn push_scroll(delta: i32, actions: &mut Vec<Action>) {
    let action = if delta < 0 {
        Action::ScrollUp
    } else {
        Action::ScrollDown
    };
    for _ in 0..delta.unsigned_abs() {
        actions.push(action.clone());
    }
}
